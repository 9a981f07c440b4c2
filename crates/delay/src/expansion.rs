//! Reconstruction expansion: how much neighbor distances grow when one more
//! delay coordinate is added, as a function of the delay.

use chaoscope_embed::embed;
use chaoscope_neighbors::{Metric, NeighborConfig, NeighborIndex};
use tracing::debug;

use crate::curve::{DelayCurve, DelayPoint};
use crate::error::DelayError;

/// Parameters for [`reconstruction_expansion`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionConfig {
    dim: usize,
    window: usize,
    metric: Metric,
}

impl ExpansionConfig {
    /// Compares dimension `dim` against `dim + 1`.
    ///
    /// Defaults: `window = 10`, Chebyshev metric.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            window: 10,
            metric: Metric::Chebyshev,
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

    /// Returns the base dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the Theiler window.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Returns the metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Mean ratio of `(d+1)`- to `d`-dimensional nearest-neighbor distance for
/// each candidate delay.
///
/// Nearest neighbors are found at dimension `d` on the first `N - tau`
/// samples, so both reconstructions have the same point count and the same
/// pair can be measured in both. Coincident neighbors are skipped. The
/// curve is advisory; see [`DelayCurve::preferred_delay`].
///
/// # Errors
///
/// Only an invalid base dimension fails the whole call. Per-delay failures
/// (series too short, no admissible neighbors) are recorded in the curve.
#[tracing::instrument(skip(x, delays, config), fields(n = x.len(), dim = config.dim))]
pub fn reconstruction_expansion<I>(x: &[f64], delays: I, config: &ExpansionConfig) -> Result<DelayCurve, DelayError>
where
    I: IntoIterator<Item = usize>,
{
    if config.dim == 0 {
        return Err(chaoscope_embed::EmbedError::InvalidDimension { dim: 0 }.into());
    }
    let points: Vec<DelayPoint> = delays
        .into_iter()
        .map(|delay| DelayPoint {
            delay,
            value: expansion_at(x, delay, config),
        })
        .collect();
    let curve = DelayCurve { points };
    debug!(delays = curve.points.len(), failures = curve.failures(), "reconstruction expansion");
    Ok(curve)
}

fn expansion_at(x: &[f64], tau: usize, config: &ExpansionConfig) -> Result<f64, DelayError> {
    if tau == 0 {
        return Err(chaoscope_embed::EmbedError::InvalidDelay { tau }.into());
    }
    let n = x.len();
    if n <= tau {
        return Err(DelayError::SeriesTooShort {
            len: n,
            required: tau + 1,
        });
    }
    let low = embed(&x[..n - tau], tau, config.dim)?;
    let high = embed(x, tau, config.dim + 1)?;

    let neighbor_config = NeighborConfig::new(config.metric).with_exclude_coincident(true);
    let index = NeighborIndex::build(&low, &neighbor_config)?;

    let mut sum = 0.0;
    let mut count = 0usize;
    for (i, nb) in index.nearest_all(config.window).into_iter().enumerate() {
        if let Some(nb) = nb {
            let grown = config.metric.distance(high.point(i), high.point(nb.index));
            sum += grown / nb.distance;
            count += 1;
        }
    }
    if count == 0 {
        return Err(DelayError::NoReferencePoints { delay: tau });
    }
    Ok(sum / count as f64)
}
