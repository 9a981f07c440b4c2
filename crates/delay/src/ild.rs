//! Integral local deformation (Buzug & Pfister 1992).
//!
//! For each reference point, the centroid of its neighborhood and the point
//! itself are both advanced `q` steps along the trajectory. The growth of
//! their separation, integrated over `q = 1..=q_max` with the trapezoidal
//! rule, measures how much the reconstruction locally deforms the flow.
//! Good delays keep that deformation small.

use chaoscope_embed::{EmbeddedTrajectory, embed};
use chaoscope_neighbors::{Metric, NeighborConfig, NeighborError, NeighborIndex, NeighborScratch};
use chaoscope_stats::min_max;
use tracing::{debug, warn};

use crate::curve::{DelayCurve, DelayPoint};
use crate::error::{DelayError, check_finite};

/// Parameters for [`ild`].
///
/// # Example
///
/// ```
/// use chaoscope_delay::IldConfig;
///
/// let config = IldConfig::new(3).with_neighbors(8).with_q_max(4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IldConfig {
    /// Embedding dimension.
    dim: usize,
    /// Number of evolution steps.
    q_max: usize,
    /// Neighbors per reference point.
    k: usize,
    /// Theiler window.
    window: usize,
    /// Distance metric.
    metric: Metric,
}

impl IldConfig {
    /// Creates a configuration for embedding dimension `dim`.
    ///
    /// Defaults: `q_max = 4`, `k = 10`, `window = 10`, Euclidean metric.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            q_max: 4,
            k: 10,
            window: 10,
            metric: Metric::Euclidean,
        }
    }

    /// Sets the number of evolution steps.
    pub fn with_q_max(mut self, q_max: usize) -> Self {
        self.q_max = q_max;
        self
    }

    /// Sets the number of neighbors per reference point.
    pub fn with_neighbors(mut self, k: usize) -> Self {
        self.k = k;
        self
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

    /// Returns the embedding dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the number of evolution steps.
    pub fn q_max(&self) -> usize {
        self.q_max
    }

    /// Returns the number of neighbors per reference point.
    pub fn k(&self) -> usize {
        self.k
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
    pub fn validate(&self) -> Result<(), DelayError> {
        if self.dim == 0 {
            return Err(chaoscope_embed::EmbedError::InvalidDimension { dim: 0 }.into());
        }
        if self.q_max == 0 {
            return Err(DelayError::InvalidMaxLag { max_lag: 0 });
        }
        if self.k == 0 {
            return Err(DelayError::InvalidK { k: 0 });
        }
        Ok(())
    }
}

impl Default for IldConfig {
    fn default() -> Self {
        Self::new(2)
    }
}

/// ILD for every delay `1..=max_tau`, normalized by `2 * (max(x) - min(x))`.
///
/// A constant series has no deformation to measure; the curve is all zeros
/// and a warning is logged.
///
/// # Errors
///
/// Configuration errors, [`DelayError::NonFiniteInput`], and
/// [`DelayError::SeriesTooShort`] when the longest reconstruction leaves no
/// room for `q_max` evolution steps. Reference points without `k`
/// admissible neighbors are skipped; a delay where every point is skipped
/// records [`DelayError::NoReferencePoints`].
#[tracing::instrument(skip(x, config), fields(n = x.len(), dim = config.dim))]
pub fn ild(x: &[f64], max_tau: usize, config: &IldConfig) -> Result<DelayCurve, DelayError> {
    config.validate()?;
    if max_tau == 0 {
        return Err(DelayError::InvalidMaxLag { max_lag: 0 });
    }
    check_finite(x)?;
    let n = x.len();
    let required = (config.dim - 1) * max_tau + config.q_max + 1;
    if n < required {
        return Err(DelayError::SeriesTooShort { len: n, required });
    }

    let (lo, hi) = min_max(x).ok_or(DelayError::SeriesTooShort { len: 0, required })?;
    if hi == lo {
        warn!("constant series: integral local deformation is zero at every delay");
        return Ok(DelayCurve {
            points: (1..=max_tau)
                .map(|delay| DelayPoint {
                    delay,
                    value: Ok(0.0),
                })
                .collect(),
        });
    }
    let scale = 2.0 * (hi - lo);

    let points = (1..=max_tau)
        .map(|delay| DelayPoint {
            delay,
            value: ild_at(x, delay, config).map(|v| v / scale),
        })
        .collect();
    let curve = DelayCurve { points };
    debug!(max_tau, failures = curve.failures(), "integral local deformation");
    Ok(curve)
}

fn ild_at(x: &[f64], tau: usize, config: &IldConfig) -> Result<f64, DelayError> {
    let traj = embed(x, tau, config.dim)?;
    let m = traj.len();
    let index = NeighborIndex::build(&traj, &NeighborConfig::new(config.metric))?;
    let mut scratch = NeighborScratch::new(config.k * 4);
    let mut neighbors = Vec::with_capacity(config.k);

    let mut total = 0.0;
    let mut refs = 0usize;
    for i in 0..m - config.q_max {
        match index.query_with_scratch(i, config.k, config.window, &mut scratch) {
            Ok(found) => {
                neighbors.clear();
                neighbors.extend(found.iter().map(|nb| nb.index));
            }
            Err(NeighborError::InsufficientNeighbors { .. }) => continue,
            Err(e) => return Err(e.into()),
        }

        let mut integral = 0.0;
        let mut prev = 0.0;
        for q in 1..=config.q_max {
            let cur = deformation(&traj, config.metric, i, q, &neighbors);
            integral += prev + cur;
            prev = cur;
        }
        total += integral;
        refs += 1;
    }

    if refs == 0 {
        return Err(DelayError::NoReferencePoints { delay: tau });
    }
    Ok(total / refs as f64)
}

/// Change in distance between point `i` and its neighborhood centroid after
/// both are advanced `q` steps. Neighbor indices that would run off the end
/// are clamped to the last point.
fn deformation(traj: &EmbeddedTrajectory, metric: Metric, i: usize, q: usize, neighbors: &[usize]) -> f64 {
    let last = traj.len() - 1;
    let before = centroid(traj, neighbors.iter().copied());
    let after = centroid(traj, neighbors.iter().map(|&j| (j + q).min(last)));
    metric.distance(&after, traj.point(i + q)) - metric.distance(&before, traj.point(i))
}

fn centroid(traj: &EmbeddedTrajectory, indices: impl Iterator<Item = usize>) -> Vec<f64> {
    let mut c = vec![0.0; traj.dim()];
    let mut count = 0usize;
    for j in indices {
        for (acc, &v) in c.iter_mut().zip(traj.point(j)) {
            *acc += v;
        }
        count += 1;
    }
    if count > 0 {
        c.iter_mut().for_each(|v| *v /= count as f64);
    }
    c
}
