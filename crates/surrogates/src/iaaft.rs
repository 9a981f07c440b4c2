//! Iterative amplitude-adjusted Fourier-transform surrogates.
//!
//! Starting from a random permutation of the data, two projections
//! alternate: impose the original spectral magnitudes while keeping the
//! current phases, then impose the original values by rank order. The
//! loop stops when the rank order stops changing, when the spectral
//! discrepancy stops changing (allclose convention), or at the cap.

use chaoscope_embed::TimeSeries;
use chaoscope_stats::{RealFft, min_max, ranks, sorted};
use num_complex::Complex;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::error::SurrogateError;

/// Iteration cap used by [`IaaftConfig::default`].
pub const DEFAULT_MAX_ITER: usize = 1000;

/// Parameters for [`iaaft`].
///
/// # Example
///
/// ```
/// use chaoscope_surrogates::IaaftConfig;
///
/// let config = IaaftConfig::new()
///     .with_max_iter(200)
///     .with_tolerance(0.0, 0.0)
///     .with_trace(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IaaftConfig {
    max_iter: usize,
    atol: f64,
    rtol: f64,
    rank_criterion: bool,
    trace: bool,
}

impl IaaftConfig {
    /// Creates the default configuration: 1000 iterations, `atol = 1e-8`,
    /// `rtol = 1e-10`, rank fixed-point criterion on, no trace.
    pub fn new() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
            atol: 1e-8,
            rtol: 1e-10,
            rank_criterion: true,
            trace: false,
        }
    }

    /// Sets the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the absolute and relative tolerance on successive spectral
    /// discrepancies. With both zero, the spectral test fires only when the
    /// discrepancy stops changing exactly.
    pub fn with_tolerance(mut self, atol: f64, rtol: f64) -> Self {
        self.atol = atol;
        self.rtol = rtol;
        self
    }

    /// Enables or disables stopping at a rank-order fixed point.
    pub fn with_rank_criterion(mut self, enabled: bool) -> Self {
        self.rank_criterion = enabled;
        self
    }

    /// Enables or disables recording of per-iteration diagnostics.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    /// Returns the iteration cap.
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Returns `(atol, rtol)`.
    pub fn tolerance(&self) -> (f64, f64) {
        (self.atol, self.rtol)
    }

    /// Whether the rank fixed-point criterion is enabled.
    pub fn rank_criterion(&self) -> bool {
        self.rank_criterion
    }

    /// Whether the trace is recorded.
    pub fn trace(&self) -> bool {
        self.trace
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), SurrogateError> {
        if self.max_iter == 0 {
            return Err(SurrogateError::InvalidIterations { max_iter: 0 });
        }
        for (name, value) in [("atol", self.atol), ("rtol", self.rtol)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SurrogateError::InvalidTolerance { name, value });
            }
        }
        Ok(())
    }
}

impl Default for IaaftConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Which test stopped an IAAFT run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvergenceCriterion {
    /// The rank-order adjustment produced the same ordering twice in a row.
    RankFixedPoint,
    /// Successive spectral discrepancies agreed within tolerance.
    SpectralTolerance,
}

/// Diagnostics of one IAAFT iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IaaftStep {
    /// Spectral discrepancy after the rank adjustment, normalized by the
    /// mean original power.
    pub discrepancy: f64,
    /// Samples whose rank changed relative to the previous iterate.
    pub rank_changes: usize,
}

/// Output of [`iaaft`].
#[derive(Debug, Clone, PartialEq)]
pub struct IaaftResult {
    /// The surrogate: a permutation of the input.
    pub series: Vec<f64>,
    /// Iterations run.
    pub iterations: usize,
    /// Whether a convergence test fired before the cap.
    pub converged: bool,
    /// The test that fired, if any.
    pub criterion: Option<ConvergenceCriterion>,
    /// Final RMS difference between original and surrogate power per bin,
    /// divided by the mean original power.
    pub discrepancy: f64,
    /// Per-iteration diagnostics; empty unless tracing was requested.
    pub trace: Vec<IaaftStep>,
}

/// Iterative amplitude-adjusted Fourier-transform surrogate.
///
/// Reaching the iteration cap is not an error: the last iterate is
/// returned with `converged = false` and a warning is logged.
///
/// # Errors
///
/// Configuration errors, empty or non-finite input, and
/// [`SurrogateError::ZeroVariance`] for a constant series.
#[tracing::instrument(skip(x, config, rng), fields(n = x.len(), max_iter = config.max_iter))]
pub fn iaaft<R>(x: &[f64], config: &IaaftConfig, rng: &mut R) -> Result<IaaftResult, SurrogateError>
where
    R: Rng + ?Sized,
{
    config.validate()?;
    TimeSeries::validate(x)?;
    let mut fft = RealFft::new(x.len());
    iaaft_with(&mut fft, x, &sorted(x), config, rng)
}

pub(crate) fn iaaft_with<R>(
    fft: &mut RealFft,
    x: &[f64],
    x_sorted: &[f64],
    config: &IaaftConfig,
    rng: &mut R,
) -> Result<IaaftResult, SurrogateError>
where
    R: Rng + ?Sized,
{
    if let Some((lo, hi)) = min_max(x)
        && lo == hi
    {
        return Err(SurrogateError::ZeroVariance { what: "series" });
    }

    let power: Vec<f64> = fft.forward(x).iter().map(|c| c.norm_sqr()).collect();
    let amplitude: Vec<f64> = power.iter().map(|p| p.sqrt()).collect();
    let mean_power = power.iter().sum::<f64>() / power.len() as f64;

    let mut current = x.to_vec();
    current.shuffle(rng);
    let mut order = ranks(&current);
    let mut spectrum = fft.forward(&current);

    let mut previous_err: Option<f64> = None;
    let mut err = f64::INFINITY;
    let mut criterion = None;
    let mut trace = Vec::new();
    let mut iterations = 0;

    for iter in 0..config.max_iter {
        iterations = iter + 1;
        for (bin, &a) in spectrum.iter_mut().zip(&amplitude) {
            let norm = bin.norm();
            *bin = if norm > 0.0 { *bin * (a / norm) } else { Complex::new(a, 0.0) };
        }
        let adjusted = fft.inverse(&spectrum);

        let next_order = ranks(&adjusted);
        let rank_changes = next_order.iter().zip(&order).filter(|(a, b)| a != b).count();
        order = next_order;
        current = order.iter().map(|&r| x_sorted[r]).collect();

        spectrum = fft.forward(&current);
        let ss: f64 = spectrum
            .iter()
            .zip(&power)
            .map(|(c, p)| (p - c.norm_sqr()).powi(2))
            .sum();
        err = (ss / power.len() as f64).sqrt();
        if config.trace {
            trace.push(IaaftStep {
                discrepancy: err / mean_power,
                rank_changes,
            });
        }

        if config.rank_criterion && rank_changes == 0 {
            criterion = Some(ConvergenceCriterion::RankFixedPoint);
            break;
        }
        if let Some(prev) = previous_err
            && (err - prev).abs() <= config.atol + config.rtol * prev.abs()
        {
            criterion = Some(ConvergenceCriterion::SpectralTolerance);
            break;
        }
        previous_err = Some(err);
    }

    let discrepancy = err / mean_power;
    let converged = criterion.is_some();
    if converged {
        debug!(iterations, discrepancy, ?criterion, "iaaft converged");
    } else {
        warn!(iterations, discrepancy, "iaaft reached the iteration cap without converging");
    }
    Ok(IaaftResult {
        series: current,
        iterations,
        converged,
        criterion,
        discrepancy,
        trace,
    })
}
