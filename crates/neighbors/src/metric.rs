//! Distance metrics over phase-space points.

use std::str::FromStr;

use chaoscope_embed::EmbeddedTrajectory;
use serde::{Deserialize, Serialize};

use crate::error::NeighborError;

/// Distance between two points of equal dimension.
///
/// Chebyshev is the default: its range does not grow with the embedding
/// dimension and the grid cells of the index are its level sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// `sqrt(Σ (a_j - b_j)²)`
    Euclidean,
    /// `max |a_j - b_j|`
    #[default]
    Chebyshev,
    /// `Σ |a_j - b_j|`
    #[serde(alias = "cityblock")]
    Manhattan,
}

impl Metric {
    /// Distance between `a` and `b`.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `a.len() == b.len()`.
    #[inline]
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let diffs = a.iter().zip(b).map(|(x, y)| (x - y).abs());
        match self {
            Metric::Euclidean => diffs.map(|d| d * d).sum::<f64>().sqrt(),
            Metric::Chebyshev => diffs.fold(0.0, f64::max),
            Metric::Manhattan => diffs.sum(),
        }
    }

    /// Combines per-coordinate ranges into the largest distance any two
    /// points inside that bounding box can have.
    pub fn extent_of_ranges(&self, ranges: &[f64]) -> f64 {
        let zero = vec![0.0; ranges.len()];
        self.distance(ranges, &zero)
    }

    /// Diameter bound of a trajectory: no pair of its points is farther
    /// apart than this.
    pub fn extent(&self, traj: &EmbeddedTrajectory) -> f64 {
        let ranges: Vec<f64> = (0..traj.dim())
            .map(|c| {
                let (lo, hi) = traj.coordinate_range(c);
                hi - lo
            })
            .collect();
        self.extent_of_ranges(&ranges)
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::Chebyshev => "chebyshev",
            Metric::Manhattan => "manhattan",
        }
    }
}

impl FromStr for Metric {
    type Err = NeighborError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Metric::Euclidean),
            "chebyshev" | "max" => Ok(Metric::Chebyshev),
            "manhattan" | "cityblock" => Ok(Metric::Manhattan),
            _ => Err(NeighborError::UnknownMetric { name: s.to_string() }),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn distances_3_4() {
        let a = [0.0, 0.0];
        let b = [3.0, -4.0];
        assert_abs_diff_eq!(Metric::Euclidean.distance(&a, &b), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(Metric::Chebyshev.distance(&a, &b), 4.0);
        assert_abs_diff_eq!(Metric::Manhattan.distance(&a, &b), 7.0);
    }

    #[test]
    fn ordering_between_metrics() {
        let a = [0.3, -1.2, 2.0];
        let b = [1.1, 0.4, -0.5];
        let e = Metric::Euclidean.distance(&a, &b);
        let c = Metric::Chebyshev.distance(&a, &b);
        let m = Metric::Manhattan.distance(&a, &b);
        assert!(c <= e && e <= m);
    }

    #[test]
    fn extent_bounds_every_pair() {
        let traj =
            EmbeddedTrajectory::from_points(vec![0.0, 1.0, 2.0, -1.0, 0.5, 3.0], 2).unwrap();
        for metric in [Metric::Euclidean, Metric::Chebyshev, Metric::Manhattan] {
            let ext = metric.extent(&traj);
            for i in 0..traj.len() {
                for j in 0..traj.len() {
                    assert!(metric.distance(traj.point(i), traj.point(j)) <= ext + 1e-12);
                }
            }
        }
        assert_abs_diff_eq!(Metric::Chebyshev.extent(&traj), 4.0);
        assert_abs_diff_eq!(Metric::Manhattan.extent(&traj), 6.0);
    }

    #[test]
    fn parse_names() {
        assert_eq!("Euclidean".parse::<Metric>().unwrap(), Metric::Euclidean);
        assert_eq!("cityblock".parse::<Metric>().unwrap(), Metric::Manhattan);
        assert_eq!("max".parse::<Metric>().unwrap(), Metric::Chebyshev);
        assert!(matches!(
            "cosine".parse::<Metric>(),
            Err(NeighborError::UnknownMetric { .. })
        ));
        assert_eq!(Metric::default().to_string(), "chebyshev");
    }
}
