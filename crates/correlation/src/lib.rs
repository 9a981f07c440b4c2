//! Correlation sums and the invariants read from them.
//!
//! | Quantity | Function |
//! |----------|----------|
//! | `C(r)` | [`correlation_sum`], [`correlation_sum_embedded`] |
//! | local slopes `d ln C / d ln r` | [`local_slopes`] |
//! | Takens–Theiler estimator | [`takens_theiler`] |
//! | `D2` over a scaling region | [`correlation_dimension`], [`correlation_dimensions`] |
//! | `K2` | [`correlation_entropy`] |
//!
//! Pairs closer in time than the Theiler window are never counted. Small
//! trajectories are counted pair by pair; larger ones enumerate only the
//! pairs within the largest radius through the neighbor grid.
//!
//! ```
//! use chaoscope_correlation::{CorrelationConfig, correlation_sum};
//! use chaoscope_embed::embed;
//!
//! let x: Vec<f64> = (0..500).map(|i| (i as f64 * 0.173).sin()).collect();
//! let traj = embed(&x, 9, 2).unwrap();
//! let sum = correlation_sum(&traj, &CorrelationConfig::new().with_num_radii(20)).unwrap();
//! assert_eq!(*sum.sums.last().unwrap(), 1.0);
//! ```

pub mod config;
pub mod dimension;
pub mod entropy;
pub mod error;
pub mod range;
pub mod sum;

pub use config::{AUTO_RANGE_DECADES, CorrelationConfig, DEFAULT_NUM_RADII, Radii};
pub use dimension::{
    CorrelationDimension, CorrelationDimensionEntry, correlation_dimension, correlation_dimensions, local_slopes,
    takens_theiler,
};
pub use entropy::{EntropyCurve, EntropySample, correlation_entropy};
pub use error::CorrelationError;
pub use range::{GeometricIter, GeometricRange};
pub use sum::{CorrelationSum, CorrelationSumEntry, admissible_pairs, correlation_sum, correlation_sum_embedded};
