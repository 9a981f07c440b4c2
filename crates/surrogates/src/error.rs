//! Error types for the chaoscope-surrogates crate.

use chaoscope_embed::{EmbedError, ErrorKind};

/// Error type for all fallible operations in the chaoscope-surrogates crate.
///
/// An IAAFT run that reaches its iteration cap is not an error; the result
/// carries `converged = false` instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurrogateError {
    /// Returned when the series takes a single value, so amplitudes or
    /// rescaling are undefined.
    #[error("{what} is constant; surrogate construction needs non-zero variance")]
    ZeroVariance {
        /// Which quantity was constant.
        what: &'static str,
    },

    /// Returned when the IAAFT iteration cap is zero.
    #[error("iteration cap must be >= 1, got {max_iter}")]
    InvalidIterations {
        /// The invalid cap.
        max_iter: usize,
    },

    /// Returned when a convergence tolerance is negative or not finite.
    #[error("tolerance {name} must be finite and non-negative, got {value}")]
    InvalidTolerance {
        /// `"atol"` or `"rtol"`.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },

    /// Returned when an ensemble of zero members is requested.
    #[error("surrogate count must be >= 1, got {count}")]
    InvalidCount {
        /// The invalid count.
        count: usize,
    },

    /// Returned when the mismatch weight is outside `[0, 1]`.
    #[error("mismatch weight must lie in [0, 1], got {weight}")]
    InvalidWeight {
        /// The invalid weight.
        weight: f64,
    },

    /// Returned when a mismatch segment plus its end-point neighborhood does
    /// not fit inside the series.
    #[error("segment of length {length} with {neigh} end points does not fit in {len} samples")]
    InvalidSegment {
        /// Requested segment length.
        length: usize,
        /// End-point neighborhood size.
        neigh: usize,
        /// Usable series length.
        len: usize,
    },

    /// Returned when the sampling interval of a spectrum is not positive.
    #[error("sampling interval must be finite and positive, got {dt}")]
    InvalidSamplingInterval {
        /// The invalid interval.
        dt: f64,
    },

    /// Returned when a method name is not recognized.
    #[error("unknown surrogate method '{name}' (expected ft, aaft or iaaft)")]
    UnknownMethod {
        /// The unrecognized name.
        name: String,
    },

    /// Invalid input series.
    #[error(transparent)]
    Embed(#[from] EmbedError),
}

impl SurrogateError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SurrogateError::ZeroVariance { .. } => ErrorKind::NumericalDegeneracy,
            SurrogateError::Embed(e) => e.kind(),
            _ => ErrorKind::InvalidParameter,
        }
    }
}
