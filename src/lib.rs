//! Nonlinear time series analysis.
//!
//! This crate bundles the workspace: delay embedding and neighbor search,
//! delay and dimension selection, correlation sums, maximal Lyapunov
//! exponents, noise reduction and surrogate data. Each part is also usable
//! on its own through its `chaoscope-*` crate.
//!
//! [`AnalysisConfig`] reads one TOML document holding the shared settings
//! (delay, dimension, Theiler window, metric) and per-estimator sections,
//! and converts them into each crate's configuration type.
//!
//! # Example
//!
//! ```
//! use chaoscope::AnalysisConfig;
//! use chaoscope::correlation::correlation_sum;
//! use chaoscope::embed::embed;
//!
//! let config = AnalysisConfig::from_toml_str("delay = 5\ndimension = 2\ntheiler_window = 5").unwrap();
//! let x: Vec<f64> = (0..400).map(|i| (i as f64 * 0.05).sin()).collect();
//! let traj = embed(&x, config.delay, config.dimension).unwrap();
//! let sum = correlation_sum(&traj, &config.to_correlation_config()).unwrap();
//! assert!(sum.sums.windows(2).all(|w| w[0] <= w[1]));
//! ```

pub mod config;
pub mod logging;

pub use chaoscope_correlation as correlation;
pub use chaoscope_delay as delay;
pub use chaoscope_dimension as dimension;
pub use chaoscope_embed as embed;
pub use chaoscope_lyapunov as lyapunov;
pub use chaoscope_neighbors as neighbors;
pub use chaoscope_noise as noise;
pub use chaoscope_stats as stats;
pub use chaoscope_surrogates as surrogates;

pub use chaoscope_embed::ErrorKind;
pub use config::{AnalysisConfig, ConfigError};
