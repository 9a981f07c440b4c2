//! Delay-coordinate embedding.
//!
//! A scalar series `x` is reconstructed into phase space as the points
//! `(x_i, x_{i+tau}, ..., x_{i+(d-1)tau})`. Vector series embed every
//! channel at each delay. The resulting [`EmbeddedTrajectory`] is what the
//! neighbor search and every invariant estimator operate on.
//!
//! This crate also defines [`ErrorKind`], the four-way failure
//! classification that every other chaoscope error type maps onto.
//!
//! ```
//! use chaoscope_embed::TimeSeries;
//!
//! let ts = TimeSeries::new((0..100).map(|i| (i as f64 * 0.1).sin()).collect()).unwrap();
//! let traj = ts.embed(4, 3).unwrap();
//! assert_eq!(traj.len(), 100 - 2 * 4);
//! assert_eq!(traj.dim(), 3);
//! ```

pub mod error;
pub mod series;
pub mod trajectory;

pub use error::{EmbedError, ErrorKind};
pub use series::TimeSeries;
pub use trajectory::{EmbeddedTrajectory, embed, embedded_len};
