//! Error types for the chaoscope-lyapunov crate.

use chaoscope_embed::{EmbedError, ErrorKind};
use chaoscope_neighbors::NeighborError;

/// Error type for all fallible operations in the chaoscope-lyapunov crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LyapunovError {
    /// Returned when a zero tracking horizon is requested.
    #[error("horizon must be >= 1, got {horizon}")]
    InvalidHorizon {
        /// The invalid horizon.
        horizon: usize,
    },

    /// Returned when a fixed fit window is empty or runs past the curve.
    #[error("fit window [{start}, {end}] is invalid for a curve of {len} steps")]
    InvalidFitWindow {
        /// First step of the window.
        start: usize,
        /// Last step of the window.
        end: usize,
        /// Number of steps in the curve.
        len: usize,
    },

    /// Returned when the Theiler window leaves no admissible pair, or no
    /// point has a nearest neighbor at a non-zero distance.
    #[error("no reference point has an admissible nearest neighbor among {len} points (window {window})")]
    NoReferencePoints {
        /// Number of trajectory points.
        len: usize,
        /// Theiler window.
        window: usize,
    },

    /// Returned when the divergence curve has no linear stretch to fit.
    #[error("no linear region found in a divergence curve of {steps} steps")]
    NoScalingRegion {
        /// Number of steps examined.
        steps: usize,
    },

    /// Embedding failure.
    #[error(transparent)]
    Embed(#[from] EmbedError),

    /// Neighbor search failure.
    #[error(transparent)]
    Neighbor(#[from] NeighborError),
}

impl LyapunovError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LyapunovError::InvalidHorizon { .. } | LyapunovError::InvalidFitWindow { .. } => {
                ErrorKind::InvalidParameter
            }
            LyapunovError::NoReferencePoints { .. } => ErrorKind::InsufficientNeighbors,
            LyapunovError::NoScalingRegion { .. } => ErrorKind::NumericalDegeneracy,
            LyapunovError::Embed(e) => e.kind(),
            LyapunovError::Neighbor(e) => e.kind(),
        }
    }
}
