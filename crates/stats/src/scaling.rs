//! Scaling-region detection.
//!
//! A scaling region is the longest contiguous stretch of a curve over which
//! it is locally linear with a stable slope. It is found by sliding a
//! fixed-width window over the samples, fitting a line in each window,
//! accepting windows whose residual is small, and merging adjacent accepted
//! windows whose slopes agree. The merged run is refitted as a whole.
//!
//! Used on `(ln r, ln C(r))` for the correlation dimension and on
//! `(t, d(t))` for the maximal Lyapunov exponent.

use crate::fit::linear_fit;

/// Parameters for [`detect_scaling_region`].
///
/// # Example
///
/// ```
/// use chaoscope_stats::ScalingConfig;
///
/// let config = ScalingConfig::new()
///     .with_window(7)
///     .with_max_residual(0.02)
///     .with_slope_tolerance(0.05);
/// assert_eq!(config.window(), 7);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ScalingConfig {
    /// Number of consecutive samples per sliding window.
    window: usize,
    /// Maximum RMS residual for a window to be accepted.
    max_residual: f64,
    /// Maximum relative slope deviation for a window to join a run.
    slope_tolerance: f64,
    /// Reject windows flatter than this fraction of the steepest accepted one.
    min_relative_slope: Option<f64>,
}

impl ScalingConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: `window = 5`, `max_residual = 0.05`, `slope_tolerance = 0.1`,
    /// `min_relative_slope = None`.
    pub fn new() -> Self {
        Self {
            window: 5,
            max_residual: 0.05,
            slope_tolerance: 0.1,
            min_relative_slope: None,
        }
    }

    /// Sets the sliding window width (at least 2 samples).
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Sets the residual threshold for accepting a window.
    pub fn with_max_residual(mut self, max_residual: f64) -> Self {
        self.max_residual = max_residual;
        self
    }

    /// Sets the relative slope tolerance used when merging windows.
    pub fn with_slope_tolerance(mut self, slope_tolerance: f64) -> Self {
        self.slope_tolerance = slope_tolerance;
        self
    }

    /// Only keep windows whose slope is at least `fraction` times the
    /// steepest accepted window.
    ///
    /// Divergence curves saturate into a long flat plateau; this keeps the
    /// plateau from winning the longest-run selection.
    pub fn with_min_relative_slope(mut self, fraction: f64) -> Self {
        self.min_relative_slope = Some(fraction);
        self
    }

    /// Returns the sliding window width.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Returns the residual threshold.
    pub fn max_residual(&self) -> f64 {
        self.max_residual
    }

    /// Returns the relative slope tolerance.
    pub fn slope_tolerance(&self) -> f64 {
        self.slope_tolerance
    }

    /// Returns the minimum relative slope, if set.
    pub fn min_relative_slope(&self) -> Option<f64> {
        self.min_relative_slope
    }

    /// Returns `true` if every parameter is usable.
    pub fn is_valid(&self) -> bool {
        self.window >= 2
            && self.max_residual.is_finite()
            && self.max_residual >= 0.0
            && self.slope_tolerance.is_finite()
            && self.slope_tolerance >= 0.0
            && self
                .min_relative_slope
                .is_none_or(|f| f.is_finite() && (0.0..=1.0).contains(&f))
    }
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A contiguous, locally linear sub-range of a sampled curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalingRegion {
    /// First sample index (inclusive).
    pub start: usize,
    /// Last sample index (inclusive).
    pub end: usize,
    /// Least-squares slope over the region.
    pub slope: f64,
    /// Least-squares intercept over the region.
    pub intercept: f64,
    /// RMS residual of the fit over the region.
    pub residual: f64,
}

impl ScalingRegion {
    /// Number of samples covered by the region.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always `false`: a region covers at least two samples.
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[derive(Clone, Copy)]
struct Window {
    start: usize,
    slope: f64,
}

/// Finds the longest scaling region of the curve `(x, y)`.
///
/// Returns `None` when the curve is shorter than one window, the lengths
/// differ, the configuration is unusable, or no window passes the residual
/// test. Ties between equally long runs go to the earliest one.
pub fn detect_scaling_region(x: &[f64], y: &[f64], config: &ScalingConfig) -> Option<ScalingRegion> {
    let n = x.len();
    let w = config.window;
    if !config.is_valid() || y.len() != n || n < w {
        return None;
    }

    // 1. Fit every window and keep those that are locally linear.
    let mut accepted: Vec<Window> = (0..=n - w)
        .filter_map(|s| {
            let fit = linear_fit(&x[s..s + w], &y[s..s + w])?;
            (fit.residual <= config.max_residual).then_some(Window {
                start: s,
                slope: fit.slope,
            })
        })
        .collect();

    if let Some(frac) = config.min_relative_slope {
        let steepest = accepted
            .iter()
            .map(|win| win.slope)
            .fold(f64::NEG_INFINITY, f64::max);
        if steepest > 0.0 {
            accepted.retain(|win| win.slope >= frac * steepest);
        }
    }
    if accepted.is_empty() {
        return None;
    }

    // 2. Merge adjacent windows whose slope stays close to the running mean.
    let mut best: Option<(usize, usize)> = None;
    let mut run_start = accepted[0].start;
    let mut run_last = accepted[0].start;
    let mut slope_sum = accepted[0].slope;
    let mut run_len = 1usize;

    let close_run = |first: usize, last: usize, best: &mut Option<(usize, usize)>| {
        let end = last + w - 1;
        if !matches!(*best, Some((s, e)) if e - s >= end - first) {
            *best = Some((first, end));
        }
    };

    for win in accepted.iter().skip(1) {
        let reference = slope_sum / run_len as f64;
        let adjacent = win.start == run_last + 1;
        let similar =
            (win.slope - reference).abs() <= config.slope_tolerance * reference.abs().max(1e-12);
        if adjacent && similar {
            run_last = win.start;
            slope_sum += win.slope;
            run_len += 1;
        } else {
            close_run(run_start, run_last, &mut best);
            run_start = win.start;
            run_last = win.start;
            slope_sum = win.slope;
            run_len = 1;
        }
    }
    close_run(run_start, run_last, &mut best);

    // 3. Refit over the whole merged run.
    let (start, end) = best?;
    let fit = linear_fit(&x[start..=end], &y[start..=end])?;
    Some(ScalingRegion {
        start,
        end,
        slope: fit.slope,
        intercept: fit.intercept,
        residual: fit.residual,
    })
}
