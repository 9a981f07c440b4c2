//! The correlation sum `C(r)`.

use chaoscope_embed::{EmbeddedTrajectory, embed};
use chaoscope_neighbors::{Metric, NeighborConfig, NeighborIndex};
use tracing::{debug, warn};

use crate::config::CorrelationConfig;
use crate::error::CorrelationError;

/// Trajectories up to this many points count pairs directly; larger ones
/// go through the neighbor index.
pub const DIRECT_PAIR_LIMIT: usize = 1500;

/// `C(r)` at a sorted set of radii.
///
/// Only radii with `C(r) > 0` are kept, so the curve can be taken to
/// log-log coordinates directly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrelationSum {
    /// Radii, ascending.
    pub radii: Vec<f64>,
    /// Fraction of admissible pairs within each radius.
    pub sums: Vec<f64>,
    /// Number of admissible pairs the sums are normalized by.
    pub pairs: u64,
}

impl CorrelationSum {
    /// Number of `(r, C(r))` points.
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    /// `true` if `C(r) = 0` at every requested radius.
    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// `(r, C(r))` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.radii.iter().copied().zip(self.sums.iter().copied())
    }

    /// `(ln r, ln C(r))` columns.
    pub fn log_log(&self) -> (Vec<f64>, Vec<f64>) {
        (
            self.radii.iter().map(|r| r.ln()).collect(),
            self.sums.iter().map(|c| c.ln()).collect(),
        )
    }
}

/// Number of pairs `(i, j)` with `j - i > window` among `m` points.
pub fn admissible_pairs(m: usize, window: usize) -> u64 {
    let m = m as u64;
    let w = window as u64;
    if m <= w + 1 {
        return 0;
    }
    (m - w - 1) * (m - w) / 2
}

/// Correlation sum of an embedded trajectory.
///
/// `C(r)` is the fraction of pairs `(i, j)` with `j - i > window` whose
/// distance is at most `r`. Under the Chebyshev metric with the default
/// radii the last value is exactly 1.
///
/// # Errors
///
/// Configuration errors, [`CorrelationError::NoPairs`] when the window
/// leaves nothing to count, and [`CorrelationError::ZeroExtent`] when
/// automatic radii are requested for a trajectory of coincident points.
#[tracing::instrument(skip(traj, config), fields(points = traj.len(), dim = traj.dim(), window = config.window()))]
pub fn correlation_sum(
    traj: &EmbeddedTrajectory,
    config: &CorrelationConfig,
) -> Result<CorrelationSum, CorrelationError> {
    config.validate()?;
    let total = admissible_pairs(traj.len(), config.window());
    if total == 0 {
        return Err(CorrelationError::NoPairs {
            len: traj.len(),
            window: config.window(),
        });
    }
    let radii = config.radii().resolve(config.metric().extent(traj))?;
    let counts = cumulative_counts(traj, &radii, config.metric(), config.window())?;

    let mut out = CorrelationSum {
        radii: Vec::with_capacity(radii.len()),
        sums: Vec::with_capacity(radii.len()),
        pairs: total,
    };
    for (&r, &count) in radii.iter().zip(&counts) {
        if count > 0 {
            out.radii.push(r);
            out.sums.push(count as f64 / total as f64);
        }
    }
    if out.is_empty() {
        warn!(radii = radii.len(), "correlation sum is zero at every radius");
    }
    debug!(kept = out.len(), pairs = total, "correlation sum");
    Ok(out)
}

/// One embedding dimension of [`correlation_sum_embedded`].
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationSumEntry {
    /// Embedding dimension.
    pub dimension: usize,
    /// The correlation sum, or why it could not be computed.
    pub outcome: Result<CorrelationSum, CorrelationError>,
}

/// Correlation sums of the delay reconstructions of `x` at each dimension.
///
/// Failures at individual dimensions (series too short, window too wide)
/// are recorded per entry.
///
/// # Errors
///
/// A zero delay, an invalid configuration, or non-finite input fail the
/// whole call.
#[tracing::instrument(skip(x, dims, config), fields(n = x.len()))]
pub fn correlation_sum_embedded<I>(
    x: &[f64],
    dims: I,
    tau: usize,
    config: &CorrelationConfig,
) -> Result<Vec<CorrelationSumEntry>, CorrelationError>
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
                .map_err(CorrelationError::from)
                .and_then(|traj| correlation_sum(&traj, config));
            if let Err(e) = &outcome {
                warn!(dimension, error = %e, "correlation sum failed");
            }
            CorrelationSumEntry { dimension, outcome }
        })
        .collect())
}

/// Pair counts within each radius of the ascending list `radii`.
pub(crate) fn cumulative_counts(
    traj: &EmbeddedTrajectory,
    radii: &[f64],
    metric: Metric,
    window: usize,
) -> Result<Vec<u64>, CorrelationError> {
    let Some(&r_max) = radii.last() else {
        return Ok(Vec::new());
    };
    let mut hist = vec![0u64; radii.len()];
    let mut bin = |d: f64| {
        // First radius that is >= d.
        let k = radii.partition_point(|&r| r < d);
        if k < hist.len() {
            hist[k] += 1;
        }
    };

    let m = traj.len();
    if m <= DIRECT_PAIR_LIMIT {
        for i in 0..m {
            let a = traj.point(i);
            for j in i + window + 1..m {
                bin(metric.distance(a, traj.point(j)));
            }
        }
    } else {
        let index = NeighborIndex::build(traj, &NeighborConfig::new(metric))?;
        index.for_each_pair_within(r_max, window, |_, _, d| bin(d))?;
    }

    let mut acc = 0u64;
    for h in &mut hist {
        acc += *h;
        *h = acc;
    }
    Ok(hist)
}
