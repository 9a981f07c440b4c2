//! Error types for the chaoscope-noise crate.

use chaoscope_embed::{EmbedError, ErrorKind};
use chaoscope_neighbors::NeighborError;

/// Error type for all fallible operations in the chaoscope-noise crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NoiseError {
    /// Returned when a neighborhood would be too small to estimate a
    /// covariance.
    #[error("neighborhood size must be >= 2, got {k}")]
    InvalidNeighborhood {
        /// The invalid neighborhood size.
        k: usize,
    },

    /// Returned when the number of retained directions is not in
    /// `1..dimension`.
    #[error("signal dimension must be in 1..{dim}, got {q}")]
    InvalidSignalDimension {
        /// Requested number of retained directions.
        q: usize,
        /// Embedding dimension.
        dim: usize,
    },

    /// Returned when zero filter passes are requested.
    #[error("number of passes must be >= 1, got {passes}")]
    InvalidPasses {
        /// The invalid pass count.
        passes: usize,
    },

    /// Returned when a neighborhood radius is negative or non-finite.
    #[error("radius must be finite and non-negative, got {radius}")]
    InvalidRadius {
        /// The invalid radius.
        radius: f64,
    },

    /// Returned when the series is shorter than one filter window.
    #[error("series of length {len} is too short; need at least {required} samples")]
    SeriesTooShort {
        /// Number of samples given.
        len: usize,
        /// Minimum number of samples.
        required: usize,
    },

    /// Returned when the symmetric eigen-solver fails to converge.
    #[error("eigen-decomposition did not converge after {sweeps} sweeps")]
    EigenNonConvergence {
        /// Sweeps performed.
        sweeps: usize,
    },

    /// Embedding failure.
    #[error(transparent)]
    Embed(#[from] EmbedError),

    /// Neighbor search failure.
    #[error(transparent)]
    Neighbor(#[from] NeighborError),
}

impl NoiseError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NoiseError::InvalidNeighborhood { .. }
            | NoiseError::InvalidSignalDimension { .. }
            | NoiseError::InvalidPasses { .. }
            | NoiseError::InvalidRadius { .. }
            | NoiseError::SeriesTooShort { .. } => ErrorKind::InvalidParameter,
            NoiseError::EigenNonConvergence { .. } => ErrorKind::NonConvergence,
            NoiseError::Embed(e) => e.kind(),
            NoiseError::Neighbor(e) => e.kind(),
        }
    }
}
