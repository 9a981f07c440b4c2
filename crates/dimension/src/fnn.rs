//! False nearest neighbors (Kennel, Brown & Abarbanel 1992).

use chaoscope_neighbors::Metric;
use chaoscope_stats::population_sd;
use tracing::{debug, warn};

use crate::error::DimensionError;
use crate::pairs::matched_pairs;

/// Parameters for [`fnn`].
///
/// # Example
///
/// ```
/// use chaoscope_dimension::FnnConfig;
///
/// let config = FnnConfig::new(8).with_rtol(15.0).with_atol(2.0).with_window(20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FnnConfig {
    /// Embedding delay.
    tau: usize,
    /// Test I threshold on the relative growth of the new coordinate.
    rtol: f64,
    /// Test II threshold on the `(d+1)`-dimensional distance in units of the
    /// series standard deviation.
    atol: f64,
    /// Theiler window.
    window: usize,
    /// Distance metric.
    metric: Metric,
}

impl FnnConfig {
    /// Creates a configuration with delay `tau`.
    ///
    /// Defaults: `rtol = 10.0`, `atol = 2.0`, `window = 10`, Euclidean
    /// metric.
    pub fn new(tau: usize) -> Self {
        Self {
            tau,
            rtol: 10.0,
            atol: 2.0,
            window: 10,
            metric: Metric::Euclidean,
        }
    }

    /// Sets the Test I threshold.
    pub fn with_rtol(mut self, rtol: f64) -> Self {
        self.rtol = rtol;
        self
    }

    /// Sets the Test II threshold.
    pub fn with_atol(mut self, atol: f64) -> Self {
        self.atol = atol;
        self
    }

    /// Sets the Theiler window.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Sets the distance metric.
    ///
    /// Test II depends strongly on the metric: under Chebyshev the
    /// near-neighbor distances stay bounded as `d` grows.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns the delay.
    pub fn tau(&self) -> usize {
        self.tau
    }

    /// Returns the Test I threshold.
    pub fn rtol(&self) -> f64 {
        self.rtol
    }

    /// Returns the Test II threshold.
    pub fn atol(&self) -> f64 {
        self.atol
    }

    /// Returns the Theiler window.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Returns the metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), DimensionError> {
        if self.tau == 0 {
            return Err(chaoscope_embed::EmbedError::InvalidDelay { tau: 0 }.into());
        }
        check_positive("rtol", self.rtol)?;
        check_positive("atol", self.atol)?;
        Ok(())
    }
}

impl Default for FnnConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Fractions of false neighbors at one dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FnnFractions {
    /// Flagged by Test I (new-coordinate growth above `rtol`).
    pub test_i: f64,
    /// Flagged by Test II (`(d+1)`-distance above `atol` standard deviations).
    pub test_ii: f64,
    /// Flagged by either test.
    pub combined: f64,
    /// Points that had an admissible neighbor.
    pub points: usize,
    /// Points skipped for lack of an admissible neighbor.
    pub skipped: usize,
}

/// Outcome at one candidate dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct FnnEntry {
    /// Candidate dimension.
    pub dimension: usize,
    /// Fractions, or why they could not be computed.
    pub outcome: Result<FnnFractions, DimensionError>,
}

/// FNN fractions over a set of candidate dimensions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FnnCurve {
    /// One entry per candidate dimension, in the order requested.
    pub entries: Vec<FnnEntry>,
}

impl FnnCurve {
    /// `(dimension, combined fraction)` for every successful dimension.
    pub fn combined(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().ok().map(|f| (e.dimension, f.combined)))
    }

    /// Smallest dimension from which the combined fraction stays at or
    /// below `threshold` for every later successful dimension.
    ///
    /// Advisory only.
    pub fn advisory_dimension(&self, threshold: f64) -> Option<usize> {
        let values: Vec<(usize, f64)> = self.combined().collect();
        let mut candidate = None;
        for &(dim, frac) in values.iter().rev() {
            if frac <= threshold {
                candidate = Some(dim);
            } else {
                break;
            }
        }
        candidate
    }
}

/// False-nearest-neighbor fractions for each candidate dimension.
///
/// For every point the nearest admissible neighbor is found at dimension
/// `d`. The pair is false by Test I if the added coordinate separates them
/// by more than `rtol` times their distance at `d`, and by Test II if their
/// `(d+1)`-dimensional distance exceeds `atol` times the (population)
/// standard deviation of the series.
///
/// # Errors
///
/// Configuration errors, [`DimensionError::ZeroVariance`] for a constant
/// series, and embedding errors for empty or non-finite input fail the
/// whole call. Failures at individual dimensions are recorded in the curve.
#[tracing::instrument(skip(x, dims, config), fields(n = x.len(), tau = config.tau))]
pub fn fnn<I>(x: &[f64], dims: I, config: &FnnConfig) -> Result<FnnCurve, DimensionError>
where
    I: IntoIterator<Item = usize>,
{
    config.validate()?;
    chaoscope_embed::TimeSeries::validate(x)?;
    let std = population_sd(x);
    if std == 0.0 {
        return Err(DimensionError::ZeroVariance);
    }

    let entries: Vec<FnnEntry> = dims
        .into_iter()
        .map(|dimension| {
            let outcome = fnn_at(x, dimension, std, config);
            match &outcome {
                Ok(f) => debug!(dimension, combined = f.combined, "false nearest neighbors"),
                Err(e) => warn!(dimension, error = %e, "false nearest neighbors failed"),
            }
            FnnEntry { dimension, outcome }
        })
        .collect();
    Ok(FnnCurve { entries })
}

fn fnn_at(x: &[f64], dim: usize, std: f64, config: &FnnConfig) -> Result<FnnFractions, DimensionError> {
    let matched = matched_pairs(x, dim, config.tau, config.metric, config.window)?;
    let high = &matched.high;
    let last = dim;

    let (mut f1, mut f2, mut f3) = (0usize, 0usize, 0usize);
    for &(i, j, dist) in &matched.pairs {
        let a = high.point(i);
        let b = high.point(j);
        let test_i = (a[last] - b[last]).abs() / dist > config.rtol;
        let test_ii = config.metric.distance(a, b) / std > config.atol;
        f1 += usize::from(test_i);
        f2 += usize::from(test_ii);
        f3 += usize::from(test_i || test_ii);
    }
    let total = matched.pairs.len() as f64;
    Ok(FnnFractions {
        test_i: f1 as f64 / total,
        test_ii: f2 as f64 / total,
        combined: f3 as f64 / total,
        points: matched.pairs.len(),
        skipped: matched.skipped,
    })
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<(), DimensionError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DimensionError::InvalidTolerance { name, value });
    }
    Ok(())
}
