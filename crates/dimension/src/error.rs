//! Error types for the chaoscope-dimension crate.

use chaoscope_embed::{EmbedError, ErrorKind};
use chaoscope_neighbors::NeighborError;

/// Error type for all fallible operations in the chaoscope-dimension crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DimensionError {
    /// Returned when a threshold parameter is non-finite or non-positive.
    #[error("{name} must be finite and positive, got {value}")]
    InvalidTolerance {
        /// Parameter name.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },

    /// Returned when the series is constant, so distances cannot be scaled.
    #[error("series has zero standard deviation")]
    ZeroVariance,

    /// Returned when no point has an admissible nearest neighbor at a
    /// candidate dimension.
    #[error("no point has an admissible nearest neighbor at dimension {dimension}")]
    NoReferencePoints {
        /// The candidate dimension.
        dimension: usize,
    },

    /// Embedding failure.
    #[error(transparent)]
    Embed(#[from] EmbedError),

    /// Neighbor search failure.
    #[error(transparent)]
    Neighbor(#[from] NeighborError),
}

impl DimensionError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DimensionError::InvalidTolerance { .. } => ErrorKind::InvalidParameter,
            DimensionError::ZeroVariance => ErrorKind::NumericalDegeneracy,
            DimensionError::NoReferencePoints { .. } => ErrorKind::InsufficientNeighbors,
            DimensionError::Embed(e) => e.kind(),
            DimensionError::Neighbor(e) => e.kind(),
        }
    }
}
