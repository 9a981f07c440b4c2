//! Nearest-neighbor pairs matched across dimensions `d` and `d + 1`.

use chaoscope_embed::{EmbeddedTrajectory, embed};
use chaoscope_neighbors::{Metric, NeighborConfig, NeighborIndex};

use crate::error::DimensionError;

/// Reconstructions at `d` and `d + 1` with equal point counts, and the
/// nearest admissible neighbor of every point at dimension `d`.
pub(crate) struct MatchedPairs {
    pub(crate) high: EmbeddedTrajectory,
    /// `(i, j, distance at d)` for every point with an admissible neighbor.
    pub(crate) pairs: Vec<(usize, usize, f64)>,
    /// Points without an admissible neighbor.
    pub(crate) skipped: usize,
}

/// Embeds the first `N - tau` samples at `d` and the full series at
/// `d + 1`, so point `i` refers to the same time index in both, then finds
/// nearest neighbors at `d`. Coincident neighbors are excluded because the
/// tests divide by the distance.
pub(crate) fn matched_pairs(
    x: &[f64],
    dim: usize,
    tau: usize,
    metric: Metric,
    window: usize,
) -> Result<MatchedPairs, DimensionError> {
    if tau == 0 {
        return Err(chaoscope_embed::EmbedError::InvalidDelay { tau }.into());
    }
    let n = x.len();
    if n <= tau {
        return Err(chaoscope_embed::EmbedError::SeriesTooShort {
            len: n,
            required: dim * tau + 1,
        }
        .into());
    }
    let low = embed(&x[..n - tau], tau, dim)?;
    let high = embed(x, tau, dim + 1)?;

    let config = NeighborConfig::new(metric).with_exclude_coincident(true);
    let index = NeighborIndex::build(&low, &config)?;
    let mut pairs = Vec::with_capacity(low.len());
    let mut skipped = 0usize;
    for (i, nb) in index.nearest_all(window).into_iter().enumerate() {
        match nb {
            Some(nb) => pairs.push((i, nb.index, nb.distance)),
            None => skipped += 1,
        }
    }
    if pairs.is_empty() {
        return Err(DimensionError::NoReferencePoints { dimension: dim });
    }
    Ok(MatchedPairs {
        high,
        pairs,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_counts_agree() {
        let x: Vec<f64> = (0..100).map(|i| (i as f64 * 0.3).sin()).collect();
        let m = matched_pairs(&x, 3, 2, Metric::Chebyshev, 2).unwrap();
        // N - d * tau points in both reconstructions.
        assert_eq!(m.high.len(), 100 - 3 * 2);
        assert_eq!(m.pairs.len() + m.skipped, 94);
        for &(i, j, d) in &m.pairs {
            assert!(i.abs_diff(j) > 2);
            assert!(d > 0.0);
        }
    }

    #[test]
    fn short_series() {
        assert!(matched_pairs(&[1.0, 2.0], 1, 2, Metric::Chebyshev, 0).is_err());
    }
}
