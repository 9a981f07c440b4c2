//! Output type for neighbor queries.

/// One admissible neighbor of a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index of the neighbor in the trajectory.
    pub index: usize,
    /// Distance to the query point under the index metric.
    pub distance: f64,
}

/// Returns `true` if `j` lies outside the Theiler window of `i`, i.e.
/// `|i - j| > window`. A point is never admissible to itself.
#[inline]
pub fn admissible(i: usize, j: usize, window: usize) -> bool {
    i.abs_diff(j) > window
}
