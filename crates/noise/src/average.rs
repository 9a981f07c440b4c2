//! Local phase-space averaging and the simple moving average.

use chaoscope_embed::{TimeSeries, embed};
use chaoscope_neighbors::{Metric, NeighborConfig, NeighborIndex};
use tracing::debug;

use crate::error::NoiseError;
use crate::result::{NoiseReduction, PassSummary, rms_difference};

/// Parameters for [`local_average`].
#[derive(Debug, Clone, PartialEq)]
pub struct LocalAverageConfig {
    dim: usize,
    tau: usize,
    radius: f64,
    metric: Metric,
    passes: usize,
}

impl LocalAverageConfig {
    /// Creates a configuration averaging over neighborhoods of `radius`.
    ///
    /// Defaults: `dim = 1`, `tau = 1`, Chebyshev metric, 1 pass. A radius of
    /// zero leaves the series unchanged.
    pub fn new(radius: f64) -> Self {
        Self {
            dim: 1,
            tau: 1,
            radius,
            metric: Metric::Chebyshev,
            passes: 1,
        }
    }

    /// Sets the embedding dimension.
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    /// Sets the embedding delay.
    pub fn with_tau(mut self, tau: usize) -> Self {
        self.tau = tau;
        self
    }

    /// Sets the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Sets the maximum number of passes.
    pub fn with_passes(mut self, passes: usize) -> Self {
        self.passes = passes;
        self
    }

    /// Returns the embedding dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the delay.
    pub fn tau(&self) -> usize {
        self.tau
    }

    /// Returns the initial radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the maximum number of passes.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), NoiseError> {
        if self.tau == 0 {
            return Err(chaoscope_embed::EmbedError::InvalidDelay { tau: 0 }.into());
        }
        if self.dim == 0 {
            return Err(chaoscope_embed::EmbedError::InvalidDimension { dim: 0 }.into());
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(NoiseError::InvalidRadius { radius: self.radius });
        }
        if self.passes == 0 {
            return Err(NoiseError::InvalidPasses { passes: 0 });
        }
        Ok(())
    }
}

/// Simple noise reduction by local phase-space averaging (Schreiber 1993).
///
/// Each delay vector's middle coordinate is replaced by the mean of that
/// coordinate over all vectors within `radius` (the vector itself
/// included). After each pass the radius becomes the RMS correction just
/// applied; passes stop early once the series no longer changes.
///
/// # Errors
///
/// Configuration and embedding errors.
#[tracing::instrument(skip(x, config), fields(n = x.len(), dim = config.dim, radius = config.radius))]
pub fn local_average(x: &[f64], config: &LocalAverageConfig) -> Result<NoiseReduction, NoiseError> {
    config.validate()?;
    TimeSeries::validate(x)?;

    let mid = if config.dim % 2 == 0 {
        config.tau * config.dim / 2
    } else {
        config.tau * (config.dim - 1) / 2
    };
    let coord = mid / config.tau;

    let mut series = x.to_vec();
    let mut radius = config.radius;
    let mut passes = Vec::new();
    for pass in 0..config.passes {
        let traj = embed(&series, config.tau, config.dim)?;
        let index = NeighborIndex::build(&traj, &NeighborConfig::new(config.metric))?;
        let mut next = series.clone();
        for i in 0..traj.len() {
            let hood = index.query_radius(i, radius, 0)?;
            let sum: f64 = traj.point(i)[coord] + hood.iter().map(|nb| traj.point(nb.index)[coord]).sum::<f64>();
            next[i + mid] = sum / (hood.len() + 1) as f64;
        }
        radius = rms_difference(&next, &series);
        debug!(pass, rms_correction = radius, "local average pass");
        series = next;
        passes.push(PassSummary {
            rms_correction: radius,
            skipped: 0,
        });
        if radius == 0.0 {
            break;
        }
    }
    Ok(NoiseReduction { series, passes })
}

/// Simple moving average over windows of `2·hwin + 1` samples.
///
/// Returns `N - 2·hwin` values; `hwin = 0` returns the input unchanged.
/// Being a linear filter, it distorts nonlinear structure.
pub fn moving_average(x: &[f64], hwin: usize) -> Result<Vec<f64>, NoiseError> {
    if hwin == 0 {
        return Ok(x.to_vec());
    }
    let width = 2 * hwin + 1;
    if x.len() < width {
        return Err(NoiseError::SeriesTooShort {
            len: x.len(),
            required: width,
        });
    }
    let mut out = Vec::with_capacity(x.len() - width + 1);
    let mut acc: f64 = x[..width].iter().sum();
    out.push(acc / width as f64);
    for k in width..x.len() {
        acc += x[k] - x[k - width];
        out.push(acc / width as f64);
    }
    Ok(out)
}
