//! Maximal Lyapunov exponent by near-neighbor divergence (Rosenstein et al.
//! 1993).
//!
//! Each point is paired with its nearest neighbor outside the Theiler
//! window, and the pair is followed forward in time. The mean log-distance
//! `d(t)` grows linearly at the rate of the largest exponent until it
//! saturates at the attractor size; the exponent is the slope of that
//! linear stretch.
//!
//! ```
//! use chaoscope_embed::embed;
//! use chaoscope_lyapunov::{FitWindow, LyapunovConfig, max_lyapunov};
//!
//! let x: Vec<f64> = (0..800).map(|i| (i as f64 * 0.21).sin()).collect();
//! let traj = embed(&x, 7, 2).unwrap();
//! let config = LyapunovConfig::new(30).with_fit(FitWindow::Fixed { start: 0, end: 20 });
//! let estimate = max_lyapunov(&traj, &config).unwrap();
//! assert!(estimate.exponent.abs() < 0.05);
//! ```

pub mod config;
pub mod divergence;
pub mod error;
pub mod exponent;

pub use config::{FitWindow, LyapunovConfig};
pub use divergence::{DivergenceCurve, DivergenceEntry, divergence, divergence_embedded};
pub use error::LyapunovError;
pub use exponent::{LyapunovEstimate, fit_divergence, max_lyapunov};
