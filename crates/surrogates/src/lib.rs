//! Surrogate data for nonlinearity tests.
//!
//! | Method | Function | Preserves |
//! |--------|----------|-----------|
//! | FT | [`ft`] | power spectrum exactly |
//! | AAFT | [`aaft`] | amplitude distribution exactly, spectrum approximately |
//! | IAAFT | [`iaaft`] | amplitude distribution exactly, spectrum to convergence |
//!
//! Every generator takes an explicit random number generator; ensembles
//! are produced sequentially from one generator ([`generate_ensemble`]) or
//! in parallel with one seeded generator per member
//! ([`generate_ensemble_par`]). [`mismatch`] picks a segment whose ends
//! join smoothly before any of these are applied.
//!
//! # Example
//!
//! ```
//! use chaoscope_surrogates::{IaaftConfig, SurrogateMethod, generate_ensemble_par};
//!
//! let x: Vec<f64> = (0..512).map(|i| (i as f64 * 0.3).sin().powi(3)).collect();
//! let ensemble = generate_ensemble_par(&x, SurrogateMethod::Iaaft, 4, &IaaftConfig::new(), 7).unwrap();
//! assert_eq!(ensemble.len(), 4);
//! for member in &ensemble.members {
//!     assert_eq!(member.series.len(), x.len());
//! }
//! ```

pub mod ensemble;
pub mod error;
pub mod fourier;
pub mod iaaft;
pub mod mismatch;

pub use ensemble::{
    Surrogate, SurrogateEnsemble, SurrogateMethod, generate, generate_ensemble, generate_ensemble_par,
};
pub use error::SurrogateError;
pub use fourier::{PowerSpectrum, aaft, ft, power_spectrum};
pub use iaaft::{ConvergenceCriterion, DEFAULT_MAX_ITER, IaaftConfig, IaaftResult, IaaftStep, iaaft};
pub use mismatch::{Mismatch, MismatchConfig, fft_friendly_length, mismatch};
