//! Error types for the chaoscope-embed crate, and the error classification
//! shared by every estimator crate.

use std::fmt;

/// Broad category of a failure.
///
/// Every crate-specific error maps onto one of these through its `kind()`
/// method, so callers can decide whether to retry, relax parameters, or
/// give up without matching on each crate's variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A parameter or input is out of range. Never retried.
    InvalidParameter,
    /// Too few admissible neighbors after temporal exclusion. Callers may
    /// retry with a smaller `k` or Theiler window.
    InsufficientNeighbors,
    /// An iterative algorithm hit its iteration cap.
    NonConvergence,
    /// Zero variance or a similar condition that would otherwise produce NaN.
    NumericalDegeneracy,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidParameter => "invalid parameter",
            ErrorKind::InsufficientNeighbors => "insufficient neighbors",
            ErrorKind::NonConvergence => "non-convergence",
            ErrorKind::NumericalDegeneracy => "numerical degeneracy",
        };
        f.write_str(name)
    }
}

/// Error type for all fallible operations in the chaoscope-embed crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmbedError {
    /// Returned when the delay is zero.
    #[error("delay must be >= 1, got {tau}")]
    InvalidDelay {
        /// The invalid delay.
        tau: usize,
    },

    /// Returned when the embedding dimension is zero.
    #[error("embedding dimension must be >= 1, got {dim}")]
    InvalidDimension {
        /// The invalid dimension.
        dim: usize,
    },

    /// Returned when the series has no samples.
    #[error("time series is empty")]
    EmptySeries,

    /// Returned when the series cannot hold a single delay vector.
    #[error("series of length {len} is too short for embedding; need at least {required} samples")]
    SeriesTooShort {
        /// Number of samples in the series.
        len: usize,
        /// Minimum number of samples, `(d - 1) * tau + 1`.
        required: usize,
    },

    /// Returned when a flat buffer cannot be split into rows of the given width.
    #[error("data length {len} is not divisible by width {width}")]
    ShapeMismatch {
        /// Length of the flat buffer.
        len: usize,
        /// Requested row width.
        width: usize,
    },

    /// Returned when the input holds NaN or infinity.
    #[error("non-finite value at index {index}")]
    NonFiniteInput {
        /// Flat index of the first offending value.
        index: usize,
    },
}

impl EmbedError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidParameter
    }
}
