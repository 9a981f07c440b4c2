//! Near-neighbor search over reconstructed phase space.
//!
//! Every estimator in chaoscope needs, for each point of an embedded
//! trajectory, the points that are close in space but not close in time.
//! [`NeighborIndex`] answers three kinds of question:
//!
//! | Query | Returns |
//! |-------|---------|
//! | [`query`](NeighborIndex::query) | the k nearest admissible neighbors |
//! | [`query_radius`](NeighborIndex::query_radius) | all admissible neighbors within r |
//! | [`for_each_pair_within`](NeighborIndex::for_each_pair_within) | every admissible pair within r, once |
//!
//! A neighbor `j` of `i` is admissible when `|i - j| > w` for the Theiler
//! window `w`. Results are ordered by ascending distance, ties by ascending
//! index.
//!
//! # Quick start
//!
//! ```
//! use chaoscope_embed::embed;
//! use chaoscope_neighbors::{Metric, NeighborConfig, NeighborIndex};
//!
//! let x: Vec<f64> = (0..500).map(|i| (i as f64 * 0.1).sin()).collect();
//! let traj = embed(&x, 15, 2).unwrap();
//! let index = NeighborIndex::build(&traj, &NeighborConfig::new(Metric::Chebyshev)).unwrap();
//!
//! let found = index.query(100, 3, 10).unwrap();
//! assert_eq!(found.len(), 3);
//! assert!(found.iter().all(|n| n.index.abs_diff(100) > 10));
//! ```
//!
//! # Architecture
//!
//! ```text
//! NeighborIndex::build()
//!   └─ bucket points into grid cells over the first two coordinates
//! NeighborIndex::query()
//!   ├─ scan cells within the current radius     (index.rs)
//!   ├─ grow the radius geometrically if short   (config.rs)
//!   └─ sort by (distance, index) and truncate   (select.rs)
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod metric;
pub mod result;

pub(crate) mod select;

pub use config::NeighborConfig;
pub use error::NeighborError;
pub use index::{NeighborIndex, NeighborScratch};
pub use metric::Metric;
pub use result::{Neighbor, admissible};
