//! Mean log-divergence of nearest-neighbor trajectory pairs.

use chaoscope_embed::{EmbeddedTrajectory, embed};
use chaoscope_neighbors::{NeighborConfig, NeighborIndex};
use tracing::{debug, warn};

use crate::config::LyapunovConfig;
use crate::error::LyapunovError;

/// `d(t)`: mean over reference points of `ln δ_t(i)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DivergenceCurve {
    /// Steps `0, 1, ..`.
    pub steps: Vec<usize>,
    /// Mean log-distance at each step.
    pub mean_log_divergence: Vec<f64>,
    /// Number of pairs averaged at each step.
    pub pair_counts: Vec<usize>,
}

impl DivergenceCurve {
    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// `true` if the curve has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// `(t, d(t))` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.steps.iter().copied().zip(self.mean_log_divergence.iter().copied())
    }

    /// Steps as floating point, for fitting.
    pub fn steps_f64(&self) -> Vec<f64> {
        self.steps.iter().map(|&t| t as f64).collect()
    }
}

/// Tracks every point and its nearest admissible neighbor forward in time.
///
/// At step `t` the pair `(i, j)` contributes `ln ||y(i + t) - y(j + t)||`
/// while both indices are still inside the trajectory. The horizon is
/// clamped to `M - window - 1`. Pairs that coincide at some step are left
/// out of that step's mean. The curve stops early at the first step with
/// no usable pair.
///
/// # Errors
///
/// An invalid configuration, or [`LyapunovError::NoReferencePoints`] when
/// no point has a nearest neighbor at a non-zero distance.
#[tracing::instrument(skip(traj, config), fields(points = traj.len(), dim = traj.dim(), horizon = config.horizon()))]
pub fn divergence(traj: &EmbeddedTrajectory, config: &LyapunovConfig) -> Result<DivergenceCurve, LyapunovError> {
    config.validate()?;
    let m = traj.len();
    let window = config.window();
    let no_pairs = LyapunovError::NoReferencePoints { len: m, window };
    if m <= window + 1 {
        return Err(no_pairs);
    }
    let horizon = config.horizon().min(m - window - 1);

    let neighbor_config = NeighborConfig::new(config.metric()).with_exclude_coincident(true);
    let index = NeighborIndex::build(traj, &neighbor_config)?;
    let pairs: Vec<(usize, usize)> = index
        .nearest_all(window)
        .into_iter()
        .enumerate()
        .filter_map(|(i, nb)| nb.map(|nb| (i, nb.index)))
        .collect();
    if pairs.is_empty() {
        return Err(no_pairs);
    }

    let mut curve = DivergenceCurve::default();
    for t in 0..horizon {
        let mut sum = 0.0;
        let mut count = 0usize;
        for &(i, j) in &pairs {
            if i + t >= m || j + t >= m {
                continue;
            }
            let d = index.distance(i + t, j + t);
            if d > 0.0 {
                sum += d.ln();
                count += 1;
            }
        }
        if count == 0 {
            warn!(step = t, "no pair left to follow; divergence curve truncated");
            break;
        }
        curve.steps.push(t);
        curve.mean_log_divergence.push(sum / count as f64);
        curve.pair_counts.push(count);
    }
    debug!(steps = curve.len(), pairs = pairs.len(), "divergence curve");
    Ok(curve)
}

/// One embedding dimension of [`divergence_embedded`].
#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceEntry {
    /// Embedding dimension.
    pub dimension: usize,
    /// The curve, or why it could not be computed.
    pub outcome: Result<DivergenceCurve, LyapunovError>,
}

/// Divergence curves of the delay reconstructions of `x` at each
/// embedding dimension.
///
/// # Errors
///
/// A zero delay, an invalid configuration, or non-finite input fail the
/// whole call. Other failures are recorded per entry.
pub fn divergence_embedded<I>(
    x: &[f64],
    dims: I,
    tau: usize,
    config: &LyapunovConfig,
) -> Result<Vec<DivergenceEntry>, LyapunovError>
where
    I: IntoIterator<Item = usize>,
{
    if tau == 0 {
        return Err(chaoscope_embed::EmbedError::InvalidDelay { tau }.into());
    }
    config.validate()?;
    chaoscope_embed::TimeSeries::validate(x)?;

    Ok(dims
        .into_iter()
        .map(|dimension| {
            let outcome = embed(x, tau, dimension)
                .map_err(LyapunovError::from)
                .and_then(|traj| divergence(&traj, config));
            if let Err(e) = &outcome {
                warn!(dimension, error = %e, "divergence failed");
            }
            DivergenceEntry { dimension, outcome }
        })
        .collect())
}
