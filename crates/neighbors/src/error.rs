//! Error types for the chaoscope-neighbors crate.

use chaoscope_embed::{EmbedError, ErrorKind};

/// Error type for all fallible operations in the chaoscope-neighbors crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NeighborError {
    /// Returned when k is zero.
    #[error("k must be >= 1, got {k}")]
    InvalidK {
        /// The invalid k value.
        k: usize,
    },

    /// Returned when a query index is past the end of the trajectory.
    #[error("query index {index} out of range for {len} points")]
    IndexOutOfRange {
        /// The requested point index.
        index: usize,
        /// Number of points in the trajectory.
        len: usize,
    },

    /// Returned when a search radius is negative, zero where a positive
    /// value is required, or non-finite.
    #[error("radius must be finite and positive, got {radius}")]
    InvalidRadius {
        /// The invalid radius.
        radius: f64,
    },

    /// Returned when the radius growth factor is not greater than one.
    #[error("radius growth factor must be finite and > 1, got {growth}")]
    InvalidGrowth {
        /// The invalid growth factor.
        growth: f64,
    },

    /// Returned when a metric name is not recognised.
    #[error("unknown metric '{name}' (expected euclidean, chebyshev or manhattan)")]
    UnknownMetric {
        /// The unrecognised name.
        name: String,
    },

    /// Returned when fewer than `requested` admissible neighbors exist
    /// after temporal exclusion, even at the largest search radius tried.
    #[error(
        "point {index}: found {found} of {requested} neighbors outside the Theiler window (radius {radius})"
    )]
    InsufficientNeighbors {
        /// The query point.
        index: usize,
        /// Admissible neighbors found.
        found: usize,
        /// Neighbors requested.
        requested: usize,
        /// Largest radius searched.
        radius: f64,
    },

    /// Embedding failure.
    #[error(transparent)]
    Embed(#[from] EmbedError),
}

impl NeighborError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NeighborError::InsufficientNeighbors { .. } => ErrorKind::InsufficientNeighbors,
            NeighborError::Embed(e) => e.kind(),
            _ => ErrorKind::InvalidParameter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_k() {
        assert_eq!(
            NeighborError::InvalidK { k: 0 }.to_string(),
            "k must be >= 1, got 0"
        );
    }

    #[test]
    fn error_index_out_of_range() {
        let e = NeighborError::IndexOutOfRange { index: 9, len: 5 };
        assert_eq!(e.to_string(), "query index 9 out of range for 5 points");
        assert_eq!(e.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn error_invalid_radius() {
        let e = NeighborError::InvalidRadius { radius: -1.5 };
        assert_eq!(e.to_string(), "radius must be finite and positive, got -1.5");
    }

    #[test]
    fn error_invalid_growth() {
        let e = NeighborError::InvalidGrowth { growth: 1.0 };
        assert_eq!(
            e.to_string(),
            "radius growth factor must be finite and > 1, got 1"
        );
    }

    #[test]
    fn error_unknown_metric() {
        let e = NeighborError::UnknownMetric {
            name: "cosine".into(),
        };
        assert_eq!(
            e.to_string(),
            "unknown metric 'cosine' (expected euclidean, chebyshev or manhattan)"
        );
    }

    #[test]
    fn error_insufficient_neighbors() {
        let e = NeighborError::InsufficientNeighbors {
            index: 3,
            found: 1,
            requested: 4,
            radius: 2.5,
        };
        assert_eq!(
            e.to_string(),
            "point 3: found 1 of 4 neighbors outside the Theiler window (radius 2.5)"
        );
        assert_eq!(e.kind(), ErrorKind::InsufficientNeighbors);
    }

    #[test]
    fn error_embed_is_transparent() {
        let e: NeighborError = EmbedError::EmptySeries.into();
        assert_eq!(e.to_string(), "time series is empty");
        assert_eq!(e.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<NeighborError>();
    }
}
