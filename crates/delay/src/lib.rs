//! Embedding delay estimation.
//!
//! | Method | Function | Delay read-off |
//! |--------|----------|----------------|
//! | Autocorrelation | [`autocorrelation`], [`acf_delay`] | first zero or first value below `1/e` |
//! | Delayed mutual information | [`delayed_mutual_information`] | [`first_minimum`] |
//! | Average displacement from diagonal | [`adfd`] | start of the plateau (by eye) |
//! | Reconstruction expansion | [`reconstruction_expansion`] | [`DelayCurve::preferred_delay`] |
//! | Integral local deformation | [`ild`] | [`DelayCurve::preferred_delay`] |
//!
//! Every read-off is advisory. The curves are returned so the caller can
//! inspect them.
//!
//! ```
//! use chaoscope_delay::{DelayCriterion, acf_delay};
//!
//! let x: Vec<f64> = (0..1000).map(|i| (i as f64 * std::f64::consts::TAU / 40.0).sin()).collect();
//! let tau = acf_delay(&x, DelayCriterion::FirstZero, None).unwrap().unwrap();
//! assert!((9..=11).contains(&tau));
//! ```

pub mod acf;
pub mod adfd;
pub mod curve;
pub mod error;
pub mod expansion;
pub mod ild;
pub mod mi;

pub use acf::{AcfConfig, DelayCriterion, acf_delay, autocorrelation};
pub use adfd::adfd;
pub use curve::{DelayCurve, DelayPoint};
pub use error::DelayError;
pub use expansion::{ExpansionConfig, reconstruction_expansion};
pub use ild::{IldConfig, ild};
pub use mi::{DEFAULT_BINS, delayed_mutual_information, first_minimum, mutual_information};
