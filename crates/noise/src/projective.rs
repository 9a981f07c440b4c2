//! Local projective noise reduction.
//!
//! Each delay vector and its `k` nearest neighbors form a neighborhood.
//! The neighborhood covariance is diagonalized and the vector is projected
//! onto the `q` directions of largest variance around the neighborhood mean.
//! A sample belongs to up to `dim` delay vectors; it moves by the average of
//! the corrections those vectors received.

use chaoscope_embed::{EmbeddedTrajectory, TimeSeries, embed};
use chaoscope_neighbors::{Metric, NeighborConfig, NeighborError, NeighborIndex, NeighborScratch};
use ndarray::{Array1, Array2};
use tracing::{debug, warn};

use crate::eigen::symmetric_eigen;
use crate::error::NoiseError;
use crate::result::{NoiseReduction, PassSummary, rms_difference};

/// Parameters for [`local_projective`].
///
/// # Example
///
/// ```
/// use chaoscope_noise::ProjectiveConfig;
///
/// let config = ProjectiveConfig::new(7)
///     .with_signal_dimension(2)
///     .with_neighbors(30)
///     .with_passes(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectiveConfig {
    /// Embedding dimension.
    dim: usize,
    /// Embedding delay.
    tau: usize,
    /// Neighbors per neighborhood (the point itself is added).
    neighbors: usize,
    /// Retained directions.
    signal_dim: usize,
    /// Filter passes.
    passes: usize,
    /// Theiler window for neighbor selection.
    window: usize,
    /// Distance metric.
    metric: Metric,
}

impl ProjectiveConfig {
    /// Creates a configuration for embedding dimension `dim`.
    ///
    /// Defaults: `tau = 1`, 20 neighbors, 2 retained directions, 1 pass,
    /// `window = 0`, Euclidean metric.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            tau: 1,
            neighbors: 20,
            signal_dim: 2,
            passes: 1,
            window: 0,
            metric: Metric::Euclidean,
        }
    }

    /// Sets the embedding delay.
    pub fn with_tau(mut self, tau: usize) -> Self {
        self.tau = tau;
        self
    }

    /// Sets the neighborhood size.
    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Sets the number of retained directions.
    pub fn with_signal_dimension(mut self, signal_dim: usize) -> Self {
        self.signal_dim = signal_dim;
        self
    }

    /// Sets the number of passes.
    pub fn with_passes(mut self, passes: usize) -> Self {
        self.passes = passes;
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

    /// Returns the delay.
    pub fn tau(&self) -> usize {
        self.tau
    }

    /// Returns the neighborhood size.
    pub fn neighbors(&self) -> usize {
        self.neighbors
    }

    /// Returns the number of retained directions.
    pub fn signal_dimension(&self) -> usize {
        self.signal_dim
    }

    /// Returns the number of passes.
    pub fn passes(&self) -> usize {
        self.passes
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
    pub fn validate(&self) -> Result<(), NoiseError> {
        if self.tau == 0 {
            return Err(chaoscope_embed::EmbedError::InvalidDelay { tau: 0 }.into());
        }
        if self.dim == 0 {
            return Err(chaoscope_embed::EmbedError::InvalidDimension { dim: 0 }.into());
        }
        if self.signal_dim == 0 || self.signal_dim >= self.dim {
            return Err(NoiseError::InvalidSignalDimension {
                q: self.signal_dim,
                dim: self.dim,
            });
        }
        if self.neighbors < 2 {
            return Err(NoiseError::InvalidNeighborhood { k: self.neighbors });
        }
        if self.passes == 0 {
            return Err(NoiseError::InvalidPasses { passes: 0 });
        }
        Ok(())
    }
}

impl Default for ProjectiveConfig {
    fn default() -> Self {
        Self::new(5)
    }
}

/// Local projective noise reduction of a scalar series.
///
/// Every pass re-embeds the output of the previous pass and rebuilds the
/// neighbor index. Points without `k` admissible neighbors are left
/// uncorrected and counted in [`PassSummary::skipped`].
///
/// # Errors
///
/// Configuration errors, embedding errors for a series too short for
/// `(dim, tau)`, and eigen-solver failure.
#[tracing::instrument(skip(x, config), fields(n = x.len(), dim = config.dim, q = config.signal_dim))]
pub fn local_projective(x: &[f64], config: &ProjectiveConfig) -> Result<NoiseReduction, NoiseError> {
    config.validate()?;
    TimeSeries::validate(x)?;

    let mut series = x.to_vec();
    let mut passes = Vec::with_capacity(config.passes);
    for pass in 0..config.passes {
        let traj = embed(&series, config.tau, config.dim)?;
        let (filtered, skipped) = project_pass(&series, &traj, config)?;
        let rms_correction = rms_difference(&filtered, &series);
        debug!(pass, rms_correction, skipped, "local projective pass");
        series = filtered;
        passes.push(PassSummary { rms_correction, skipped });
        if rms_correction == 0.0 {
            break;
        }
    }
    Ok(NoiseReduction { series, passes })
}

fn project_pass(
    series: &[f64],
    traj: &EmbeddedTrajectory,
    config: &ProjectiveConfig,
) -> Result<(Vec<f64>, usize), NoiseError> {
    let dim = config.dim;
    let index = NeighborIndex::build(traj, &NeighborConfig::new(config.metric))?;
    let mut scratch = NeighborScratch::new(config.neighbors * 4);

    let mut correction = vec![0.0; series.len()];
    let mut counts = vec![0usize; series.len()];
    let mut skipped = 0usize;

    let size = config.neighbors + 1;
    let mut hood = Array2::<f64>::zeros((size, dim));
    for i in 0..traj.len() {
        let found = match index.query_with_scratch(i, config.neighbors, config.window, &mut scratch) {
            Ok(found) => found,
            Err(NeighborError::InsufficientNeighbors { .. }) => {
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        hood.row_mut(0).assign(&ndarray::ArrayView1::from(traj.point(i)));
        for (row, nb) in found.iter().enumerate() {
            hood.row_mut(row + 1)
                .assign(&ndarray::ArrayView1::from(traj.point(nb.index)));
        }

        let delta = project_point(&hood, traj.point(i), config.signal_dim)?;
        for (a, d) in delta.iter().enumerate() {
            let s = i + a * config.tau;
            correction[s] += d;
            counts[s] += 1;
        }
    }
    if skipped > 0 {
        warn!(skipped, "points without enough neighbors were not corrected");
    }

    let filtered = series
        .iter()
        .zip(correction.iter().zip(&counts))
        .map(|(&v, (&c, &k))| if k > 0 { v + c / k as f64 } else { v })
        .collect();
    Ok((filtered, skipped))
}

/// Correction that moves `point` onto the `q`-dimensional principal
/// subspace through the mean of `hood` (one point per row).
fn project_point(hood: &Array2<f64>, point: &[f64], q: usize) -> Result<Array1<f64>, NoiseError> {
    let n = hood.nrows() as f64;
    let mean = hood.sum_axis(ndarray::Axis(0)) / n;
    let centered = hood - &mean;
    let cov = centered.t().dot(&centered) / n;
    let (_, vectors) = symmetric_eigen(&cov)?;

    let offset = &ndarray::ArrayView1::from(point) - &mean;
    let signal = vectors.slice(ndarray::s![.., ..q]);
    let kept = signal.dot(&signal.t().dot(&offset));
    Ok(kept - offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn config_validation() {
        assert!(ProjectiveConfig::default().validate().is_ok());
        assert_eq!(
            ProjectiveConfig::new(3).with_signal_dimension(3).validate(),
            Err(NoiseError::InvalidSignalDimension { q: 3, dim: 3 })
        );
        assert_eq!(
            ProjectiveConfig::new(3).with_signal_dimension(0).validate(),
            Err(NoiseError::InvalidSignalDimension { q: 0, dim: 3 })
        );
        assert_eq!(
            ProjectiveConfig::new(3).with_neighbors(1).validate(),
            Err(NoiseError::InvalidNeighborhood { k: 1 })
        );
        assert_eq!(
            ProjectiveConfig::new(3).with_passes(0).validate(),
            Err(NoiseError::InvalidPasses { passes: 0 })
        );
        assert!(ProjectiveConfig::new(3).with_tau(0).validate().is_err());
    }

    #[test]
    fn projection_removes_off_plane_component() {
        // Neighborhood spread along the first two axes only.
        let hood = ndarray::array![
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, -2.0, 0.0],
            [0.5, 0.5, 0.0]
        ];
        let delta = project_point(&hood, &[0.3, 0.4, 0.25], 2).unwrap();
        assert_abs_diff_eq!(delta[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(delta[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(delta[2], -0.25, epsilon = 1e-12);
    }

    #[test]
    fn linear_ramp_is_a_fixed_point() {
        // Delay vectors of a ramp lie on a line; projecting onto one
        // direction changes nothing.
        let x: Vec<f64> = (0..80).map(|i| 0.5 + 0.01 * i as f64).collect();
        let config = ProjectiveConfig::new(3).with_signal_dimension(1).with_neighbors(4);
        let out = local_projective(&x, &config).unwrap();
        assert_eq!(out.series.len(), x.len());
        for (a, b) in out.series.iter().zip(&x) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
        assert_eq!(out.passes[0].skipped, 0);
    }

    #[test]
    fn too_short_for_embedding() {
        let err = local_projective(&[1.0, 2.0], &ProjectiveConfig::new(5)).unwrap_err();
        assert_eq!(err.kind(), chaoscope_embed::ErrorKind::InvalidParameter);
    }
}
