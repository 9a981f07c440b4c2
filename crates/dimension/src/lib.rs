//! Minimum embedding dimension estimation.
//!
//! | Method | Function | Reading |
//! |--------|----------|---------|
//! | False nearest neighbors | [`fnn`] | fraction drops to ~0 and stays there |
//! | Averaged false neighbors (Cao) | [`afn`] | `E1` saturates; `E2` departs from 1 for deterministic data |
//!
//! Both compare each point's nearest admissible neighbor at dimension `d`
//! with the same pair at `d + 1`. Per-dimension failures are recorded in
//! the returned curve so one short or degenerate candidate does not discard
//! the rest.
//!
//! ```
//! use chaoscope_dimension::{FnnConfig, fnn};
//!
//! let x: Vec<f64> = (0..400).map(|i| (i as f64 * 0.2).sin()).collect();
//! let curve = fnn(&x, 1..=3, &FnnConfig::new(8).with_window(5)).unwrap();
//! assert_eq!(curve.entries.len(), 3);
//! ```

pub mod afn;
pub mod error;
pub mod fnn;

pub(crate) mod pairs;

pub use afn::{AfnConfig, AfnCurve, AfnEntry, AfnStatistics, afn};
pub use error::DimensionError;
pub use fnn::{FnnConfig, FnnCurve, FnnEntry, FnnFractions, fnn};
