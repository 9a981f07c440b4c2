//! Noise reduction for time series from deterministic systems.
//!
//! | Filter | Function | Idea |
//! |--------|----------|------|
//! | Local projective | [`local_projective`] | project each delay vector onto the principal directions of its neighborhood |
//! | Local averaging | [`local_average`] | replace each sample by its mean over a phase-space neighborhood |
//! | Moving average | [`moving_average`] | linear smoothing baseline |
//!
//! The phase-space filters re-embed and re-index the series on every pass,
//! since the previous pass moved the points.

pub mod average;
pub mod error;
pub mod projective;
pub mod result;

pub(crate) mod eigen;

pub use average::{LocalAverageConfig, local_average, moving_average};
pub use error::NoiseError;
pub use projective::{ProjectiveConfig, local_projective};
pub use result::{NoiseReduction, PassSummary};
