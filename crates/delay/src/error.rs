//! Error types for the chaoscope-delay crate.

use chaoscope_embed::{EmbedError, ErrorKind};
use chaoscope_neighbors::NeighborError;

/// Error type for all fallible operations in the chaoscope-delay crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DelayError {
    /// Returned when the series has too few samples for the request.
    #[error("series of length {len} is too short; need at least {required} samples")]
    SeriesTooShort {
        /// Number of samples given.
        len: usize,
        /// Minimum number of samples.
        required: usize,
    },

    /// Returned when a maximum lag of zero is requested.
    #[error("maximum lag must be >= 1, got {max_lag}")]
    InvalidMaxLag {
        /// The invalid maximum lag.
        max_lag: usize,
    },

    /// Returned when a histogram is requested with no bins.
    #[error("bin count must be >= 1, got {bins}")]
    InvalidBins {
        /// The invalid bin count.
        bins: usize,
    },

    /// Returned when a neighbor count of zero is requested.
    #[error("neighbor count must be >= 1, got {k}")]
    InvalidK {
        /// The invalid neighbor count.
        k: usize,
    },

    /// Returned when paired inputs differ in length.
    #[error("paired inputs differ in length: {x} vs {y}")]
    LengthMismatch {
        /// Length of the first input.
        x: usize,
        /// Length of the second input.
        y: usize,
    },

    /// Returned when an input holds NaN or infinity.
    #[error("non-finite value at index {index}")]
    NonFiniteInput {
        /// Index of the first offending value.
        index: usize,
    },

    /// Returned when a statistic is undefined because the input is constant.
    #[error("{statistic} is undefined for a constant series")]
    ZeroVariance {
        /// Name of the statistic that could not be computed.
        statistic: &'static str,
    },

    /// Returned when no reference point at a delay has admissible neighbors.
    #[error("no reference point has admissible neighbors at delay {delay}")]
    NoReferencePoints {
        /// The candidate delay.
        delay: usize,
    },

    /// Embedding failure.
    #[error(transparent)]
    Embed(#[from] EmbedError),

    /// Neighbor search failure.
    #[error(transparent)]
    Neighbor(#[from] NeighborError),
}

impl DelayError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DelayError::ZeroVariance { .. } => ErrorKind::NumericalDegeneracy,
            DelayError::NoReferencePoints { .. } => ErrorKind::InsufficientNeighbors,
            DelayError::Embed(e) => e.kind(),
            DelayError::Neighbor(e) => e.kind(),
            _ => ErrorKind::InvalidParameter,
        }
    }
}

pub(crate) fn check_finite(x: &[f64]) -> Result<(), DelayError> {
    match x.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(DelayError::NonFiniteInput { index }),
        None => Ok(()),
    }
}
