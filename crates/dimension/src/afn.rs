//! Averaged false neighbors (Cao 1997).
//!
//! For each dimension `d`:
//!
//! ```text
//! E(d)  = mean_i  ||y_i - y_j||_{d+1} / ||y_i - y_j||_d
//! E*(d) = mean_i  |x_{i+d·tau} - x_{j+d·tau}|
//! E1(d) = E(d+1) / E(d)
//! E2(d) = E*(d+1) / E*(d)
//! ```
//!
//! where `j` is the nearest admissible neighbor of `i` at dimension `d`.
//! E1 stops changing once `d` reaches the minimum embedding dimension of a
//! deterministic attractor. E2 is identically close to 1 for independent
//! data; the same statistic computed on shuffled copies gives that baseline
//! directly.

use chaoscope_neighbors::Metric;
use chaoscope_stats::min_max;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::error::DimensionError;
use crate::pairs::matched_pairs;

/// Parameters for [`afn`].
#[derive(Debug, Clone, PartialEq)]
pub struct AfnConfig {
    /// Embedding delay.
    tau: usize,
    /// Theiler window.
    window: usize,
    /// Distance metric.
    metric: Metric,
    /// Number of shuffled copies for the E2 baseline (0 disables it).
    shuffles: usize,
}

impl AfnConfig {
    /// Creates a configuration with delay `tau`.
    ///
    /// Defaults: `window = 10`, Chebyshev metric, one shuffled copy.
    pub fn new(tau: usize) -> Self {
        Self {
            tau,
            window: 10,
            metric: Metric::Chebyshev,
            shuffles: 1,
        }
    }

    /// Sets the Theiler window.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Sets the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Sets the number of shuffled copies averaged for the E2 baseline.
    pub fn with_shuffles(mut self, shuffles: usize) -> Self {
        self.shuffles = shuffles;
        self
    }

    /// Returns the delay.
    pub fn tau(&self) -> usize {
        self.tau
    }

    /// Returns the Theiler window.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Returns the metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the number of shuffled copies.
    pub fn shuffles(&self) -> usize {
        self.shuffles
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// An embedding error for a zero delay.
    pub fn validate(&self) -> Result<(), DimensionError> {
        if self.tau == 0 {
            return Err(chaoscope_embed::EmbedError::InvalidDelay { tau: 0 }.into());
        }
        Ok(())
    }
}

impl Default for AfnConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

/// `E(d)` and `E*(d)` at one dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AfnStatistics {
    /// Mean distance magnification from `d` to `d + 1`.
    pub e: f64,
    /// Mean absolute separation along the added coordinate.
    pub e_star: f64,
}

/// Outcome at one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct AfnEntry {
    /// Embedding dimension.
    pub dimension: usize,
    /// Statistics, or why they could not be computed.
    pub outcome: Result<AfnStatistics, DimensionError>,
}

/// AFN statistics for `d = 1..=max_dim + 1`, plus the shuffled-copy E2
/// baseline for `d = 1..=max_dim`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AfnCurve {
    /// `E` and `E*` per dimension.
    pub entries: Vec<AfnEntry>,
    /// `(d, E2(d))` averaged over the shuffled copies.
    pub shuffled_e2: Vec<(usize, f64)>,
}

impl AfnCurve {
    /// `(d, E1(d))` wherever both `d` and `d + 1` succeeded.
    pub fn e1(&self) -> Vec<(usize, f64)> {
        consecutive_ratios(&self.entries, |s| s.e)
    }

    /// `(d, E2(d))` wherever both `d` and `d + 1` succeeded.
    pub fn e2(&self) -> Vec<(usize, f64)> {
        consecutive_ratios(&self.entries, |s| s.e_star)
    }

    /// First dimension `d` at which `E1` has stopped changing:
    /// `|E1(d + 1) - E1(d)| <= tol`.
    ///
    /// Advisory only.
    pub fn saturation_dimension(&self, tol: f64) -> Option<usize> {
        self.e1()
            .windows(2)
            .find(|w| w[1].0 == w[0].0 + 1 && (w[1].1 - w[0].1).abs() <= tol)
            .map(|w| w[0].0)
    }

    /// Largest deviation of `E2` from 1 over the computed dimensions.
    ///
    /// Near zero for independent data; clearly positive for deterministic
    /// data.
    pub fn e2_deviation(&self) -> Option<f64> {
        self.e2()
            .iter()
            .map(|&(_, v)| (v - 1.0).abs())
            .reduce(f64::max)
    }
}

/// Averaged-false-neighbor statistics for `d = 1..=max_dim`.
///
/// `rng` draws the permutations for the shuffled-copy baseline; pass a
/// seeded generator for reproducible output.
///
/// # Errors
///
/// A zero delay or `max_dim`, invalid input data and a constant series
/// ([`DimensionError::ZeroVariance`]) fail the whole call. Failures at
/// individual dimensions are recorded in the curve.
#[tracing::instrument(skip(x, config, rng), fields(n = x.len(), tau = config.tau))]
pub fn afn<R>(x: &[f64], max_dim: usize, config: &AfnConfig, rng: &mut R) -> Result<AfnCurve, DimensionError>
where
    R: Rng + ?Sized,
{
    config.validate()?;
    if max_dim == 0 {
        return Err(chaoscope_embed::EmbedError::InvalidDimension { dim: 0 }.into());
    }
    chaoscope_embed::TimeSeries::validate(x)?;
    if let Some((lo, hi)) = min_max(x)
        && lo == hi
    {
        return Err(DimensionError::ZeroVariance);
    }

    let entries = afn_entries(x, max_dim, config);
    for e in &entries {
        if let Err(err) = &e.outcome {
            warn!(dimension = e.dimension, error = %err, "averaged false neighbors failed");
        }
    }

    let mut sums = vec![(0.0, 0usize); max_dim];
    let mut copy = x.to_vec();
    for _ in 0..config.shuffles {
        copy.shuffle(rng);
        let shuffled = afn_entries(&copy, max_dim, config);
        for (d, ratio) in consecutive_ratios(&shuffled, |s| s.e_star) {
            let slot = &mut sums[d - 1];
            slot.0 += ratio;
            slot.1 += 1;
        }
    }
    let shuffled_e2: Vec<(usize, f64)> = sums
        .iter()
        .enumerate()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(i, &(sum, count))| (i + 1, sum / count as f64))
        .collect();

    debug!(max_dim, shuffles = config.shuffles, "averaged false neighbors");
    Ok(AfnCurve {
        entries,
        shuffled_e2,
    })
}

fn afn_entries(x: &[f64], max_dim: usize, config: &AfnConfig) -> Vec<AfnEntry> {
    (1..=max_dim + 1)
        .map(|dimension| AfnEntry {
            dimension,
            outcome: afn_at(x, dimension, config),
        })
        .collect()
}

fn afn_at(x: &[f64], dim: usize, config: &AfnConfig) -> Result<AfnStatistics, DimensionError> {
    let matched = matched_pairs(x, dim, config.tau, config.metric, config.window)?;
    let high = &matched.high;
    let mut e = 0.0;
    let mut e_star = 0.0;
    for &(i, j, dist) in &matched.pairs {
        let a = high.point(i);
        let b = high.point(j);
        e += config.metric.distance(a, b) / dist;
        e_star += (a[dim] - b[dim]).abs();
    }
    let n = matched.pairs.len() as f64;
    Ok(AfnStatistics {
        e: e / n,
        e_star: e_star / n,
    })
}

fn consecutive_ratios(entries: &[AfnEntry], f: impl Fn(&AfnStatistics) -> f64) -> Vec<(usize, f64)> {
    entries
        .windows(2)
        .filter_map(|w| {
            let lo = w[0].outcome.as_ref().ok()?;
            let hi = w[1].outcome.as_ref().ok()?;
            let denom = f(lo);
            (w[1].dimension == w[0].dimension + 1 && denom > 0.0).then(|| (w[0].dimension, f(hi) / denom))
        })
        .collect()
}
