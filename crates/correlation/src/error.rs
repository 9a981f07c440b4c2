//! Error types for the chaoscope-correlation crate.

use chaoscope_embed::{EmbedError, ErrorKind};
use chaoscope_neighbors::NeighborError;

/// Error type for all fallible operations in the chaoscope-correlation crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CorrelationError {
    /// Returned when an explicit radius is zero, negative or non-finite.
    #[error("radius must be finite and positive, got {radius}")]
    InvalidRadius {
        /// The invalid radius.
        radius: f64,
    },

    /// Returned when a radius range is empty or reversed.
    #[error("radius range requires 0 < r_min < r_max, got [{r_min}, {r_max}]")]
    InvalidRadiusRange {
        /// Lower end of the range.
        r_min: f64,
        /// Upper end of the range.
        r_max: f64,
    },

    /// Returned when fewer than two radii are requested from a range.
    #[error("number of radii must be >= 2, got {num}")]
    InvalidRadiusCount {
        /// The invalid count.
        num: usize,
    },

    /// Returned when an explicit radius list is empty.
    #[error("radius list is empty")]
    NoRadii,

    /// Returned when a local-slope half window is zero.
    #[error("half window must be >= 1, got {hwin}")]
    InvalidHalfWindow {
        /// The invalid half window.
        hwin: usize,
    },

    /// Returned when radii and sums have different lengths.
    #[error("{radii} radii but {sums} correlation sums")]
    LengthMismatch {
        /// Number of radii.
        radii: usize,
        /// Number of sums.
        sums: usize,
    },

    /// Returned when a curve's radii are not strictly ascending.
    #[error("radii must be strictly ascending; radius {radius} at index {index} does not exceed its predecessor")]
    UnsortedRadii {
        /// Position of the offending radius.
        index: usize,
        /// The offending radius.
        radius: f64,
    },

    /// Returned when a correlation sum is not a finite positive value.
    #[error("correlation sum must be finite and positive, got {sum} at index {index}")]
    InvalidSum {
        /// Position of the offending sum.
        index: usize,
        /// The offending sum.
        sum: f64,
    },

    /// Returned when the Theiler window leaves no point pair to count.
    #[error("no point pairs remain outside a Theiler window of {window} among {len} points")]
    NoPairs {
        /// Number of trajectory points.
        len: usize,
        /// Theiler window.
        window: usize,
    },

    /// Returned when automatic radii are requested for a trajectory whose
    /// points all coincide.
    #[error("trajectory has zero extent; radii cannot be derived from it")]
    ZeroExtent,

    /// Returned when no part of the curve is linear enough to fit.
    #[error("no scaling region found in {points} points")]
    NoScalingRegion {
        /// Number of points examined.
        points: usize,
    },

    /// Embedding failure.
    #[error(transparent)]
    Embed(#[from] EmbedError),

    /// Neighbor search failure.
    #[error(transparent)]
    Neighbor(#[from] NeighborError),
}

impl CorrelationError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CorrelationError::InvalidRadius { .. }
            | CorrelationError::InvalidRadiusRange { .. }
            | CorrelationError::InvalidRadiusCount { .. }
            | CorrelationError::NoRadii
            | CorrelationError::InvalidHalfWindow { .. }
            | CorrelationError::LengthMismatch { .. }
            | CorrelationError::UnsortedRadii { .. }
            | CorrelationError::InvalidSum { .. } => ErrorKind::InvalidParameter,
            CorrelationError::NoPairs { .. } => ErrorKind::InsufficientNeighbors,
            CorrelationError::ZeroExtent | CorrelationError::NoScalingRegion { .. } => {
                ErrorKind::NumericalDegeneracy
            }
            CorrelationError::Embed(e) => e.kind(),
            CorrelationError::Neighbor(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            CorrelationError::InvalidRadiusRange { r_min: 2.0, r_max: 1.0 }.to_string(),
            "radius range requires 0 < r_min < r_max, got [2, 1]"
        );
        assert_eq!(
            CorrelationError::NoPairs { len: 5, window: 10 }.to_string(),
            "no point pairs remain outside a Theiler window of 10 among 5 points"
        );
        assert_eq!(
            CorrelationError::InvalidRadiusCount { num: 1 }.to_string(),
            "number of radii must be >= 2, got 1"
        );
        assert_eq!(
            CorrelationError::NoScalingRegion { points: 12 }.to_string(),
            "no scaling region found in 12 points"
        );
    }

    #[test]
    fn kinds() {
        assert_eq!(CorrelationError::NoRadii.kind(), ErrorKind::InvalidParameter);
        assert_eq!(
            CorrelationError::NoPairs { len: 1, window: 0 }.kind(),
            ErrorKind::InsufficientNeighbors
        );
        assert_eq!(CorrelationError::ZeroExtent.kind(), ErrorKind::NumericalDegeneracy);
        let e: CorrelationError = EmbedError::InvalidDimension { dim: 0 }.into();
        assert_eq!(e.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<CorrelationError>();
    }
}
