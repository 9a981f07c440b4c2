//! Grid-partitioned neighbor index and its queries.

use std::collections::HashMap;

use chaoscope_embed::EmbeddedTrajectory;
use tracing::{debug, trace};

use crate::config::NeighborConfig;
use crate::error::NeighborError;
use crate::metric::Metric;
use crate::result::{Neighbor, admissible};
use crate::select::sort_and_take;

/// Target average occupancy of a grid cell when the radius is automatic.
const POINTS_PER_CELL: f64 = 8.0;

/// Upper bound on cells per grid axis.
const MAX_CELLS_PER_AXIS: f64 = 1.0e6;

type CellKey = (i64, i64);

/// Pre-allocated buffers for repeated queries.
///
/// Reuse across calls to [`NeighborIndex::query_with_scratch`] to avoid a
/// heap allocation per query point.
#[derive(Debug, Clone, Default)]
pub struct NeighborScratch {
    pairs: Vec<(f64, usize)>,
    out: Vec<Neighbor>,
}

impl NeighborScratch {
    /// Creates a scratch buffer sized for `capacity` candidates.
    pub fn new(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
            out: Vec::with_capacity(capacity),
        }
    }
}

/// Box-partitioned spatial index over an [`EmbeddedTrajectory`].
///
/// Points are bucketed into square cells over their first one or two
/// coordinates. A coordinate difference above `r` on any axis implies a
/// distance above `r` under every supported metric, so a radius-`r` query
/// only needs the cells within `ceil(r / cell)` steps of the query cell.
/// When that block would cover more cells than are occupied the query
/// falls back to a linear scan.
#[derive(Debug, Clone)]
pub struct NeighborIndex<'a> {
    traj: &'a EmbeddedTrajectory,
    config: NeighborConfig,
    grid_dims: usize,
    origin: [f64; 2],
    cell: f64,
    start_radius: f64,
    diameter: f64,
    keys: Vec<CellKey>,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl<'a> NeighborIndex<'a> {
    /// Builds the index.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error, if any.
    pub fn build(traj: &'a EmbeddedTrajectory, config: &NeighborConfig) -> Result<Self, NeighborError> {
        config.validate()?;
        let grid_dims = traj.dim().min(2);
        let m = traj.len();

        let mut origin = [0.0; 2];
        let mut grid_extent: f64 = 0.0;
        for (c, o) in origin.iter_mut().enumerate().take(grid_dims) {
            let (lo, hi) = traj.coordinate_range(c);
            *o = lo;
            grid_extent = grid_extent.max(hi - lo);
        }
        let diameter = config.metric().extent(traj);

        let start_radius = config.initial_radius().unwrap_or_else(|| {
            let per_axis = (m as f64 / POINTS_PER_CELL)
                .powf(1.0 / grid_dims as f64)
                .floor()
                .max(1.0);
            if grid_extent > 0.0 {
                grid_extent / per_axis
            } else {
                1.0
            }
        });
        // Slightly wider than the radius so a query at exactly the starting
        // radius stays within the adjacent cells.
        let cell = (start_radius * (1.0 + 1e-9)).max(grid_extent / MAX_CELLS_PER_AXIS);

        let mut keys = Vec::with_capacity(m);
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (i, p) in traj.points().enumerate() {
            let key = cell_key(p, &origin, grid_dims, cell);
            keys.push(key);
            cells.entry(key).or_default().push(i);
        }

        debug!(
            points = m,
            dim = traj.dim(),
            cells = cells.len(),
            cell_size = cell,
            metric = %config.metric(),
            "built neighbor index"
        );

        Ok(Self {
            traj,
            config: config.clone(),
            grid_dims,
            origin,
            cell,
            start_radius,
            diameter,
            keys,
            cells,
        })
    }

    /// The indexed trajectory.
    pub fn trajectory(&self) -> &'a EmbeddedTrajectory {
        self.traj
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.traj.len()
    }

    /// Always `false`: trajectories are never empty.
    pub fn is_empty(&self) -> bool {
        self.traj.is_empty()
    }

    /// The distance metric.
    pub fn metric(&self) -> Metric {
        self.config.metric()
    }

    /// Upper bound on the distance between any two indexed points.
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Radius at which k-nearest queries start.
    pub fn start_radius(&self) -> f64 {
        self.start_radius
    }

    /// Distance between indexed points `i` and `j`.
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.metric().distance(self.traj.point(i), self.traj.point(j))
    }

    /// The `k` nearest admissible neighbors of point `i`, ascending by
    /// distance with ties broken by ascending index.
    ///
    /// A neighbor `j` is admissible when `|i - j| > window` (and, if the
    /// index excludes coincident points, when its distance is positive).
    ///
    /// # Errors
    ///
    /// [`NeighborError::InvalidK`], [`NeighborError::IndexOutOfRange`], or
    /// [`NeighborError::InsufficientNeighbors`] when fewer than `k`
    /// admissible points exist within the largest radius searched.
    pub fn query(&self, i: usize, k: usize, window: usize) -> Result<Vec<Neighbor>, NeighborError> {
        let mut scratch = NeighborScratch::new(k.saturating_mul(4));
        Ok(self.query_with_scratch(i, k, window, &mut scratch)?.to_vec())
    }

    /// Same as [`query`](Self::query), writing into a reusable buffer.
    pub fn query_with_scratch<'s>(
        &self,
        i: usize,
        k: usize,
        window: usize,
        scratch: &'s mut NeighborScratch,
    ) -> Result<&'s [Neighbor], NeighborError> {
        if k == 0 {
            return Err(NeighborError::InvalidK { k });
        }
        self.check_index(i)?;

        let mut radius = self.start_radius;
        let mut expansions = 0usize;
        loop {
            scratch.pairs.clear();
            self.collect_within(i, radius, window, &mut scratch.pairs);
            if scratch.pairs.len() >= k {
                sort_and_take(&mut scratch.pairs, Some(k), &mut scratch.out);
                return Ok(&scratch.out);
            }
            if radius >= self.diameter || expansions >= self.config.max_expansions() {
                return Err(NeighborError::InsufficientNeighbors {
                    index: i,
                    found: scratch.pairs.len(),
                    requested: k,
                    radius,
                });
            }
            radius = (radius * self.config.growth()).min(self.diameter.max(radius));
            expansions += 1;
            trace!(point = i, radius, found = scratch.pairs.len(), "expanding search radius");
        }
    }

    /// Nearest admissible neighbor of point `i`.
    pub fn nearest(&self, i: usize, window: usize) -> Result<Neighbor, NeighborError> {
        let mut scratch = NeighborScratch::new(4);
        let found = self.query_with_scratch(i, 1, window, &mut scratch)?;
        Ok(found[0])
    }

    /// Nearest admissible neighbor of every point, `None` where a point has
    /// no admissible neighbor at all.
    pub fn nearest_all(&self, window: usize) -> Vec<Option<Neighbor>> {
        let mut scratch = NeighborScratch::new(64);
        let mut misses = 0usize;
        let out: Vec<Option<Neighbor>> = (0..self.len())
            .map(|i| match self.query_with_scratch(i, 1, window, &mut scratch) {
                Ok(found) => Some(found[0]),
                Err(_) => {
                    misses += 1;
                    None
                }
            })
            .collect();
        if misses > 0 {
            debug!(misses, window, "points without an admissible nearest neighbor");
        }
        out
    }

    /// Every admissible neighbor of point `i` within distance `radius`
    /// (inclusive), ascending by distance.
    ///
    /// # Errors
    ///
    /// [`NeighborError::IndexOutOfRange`] or, for a negative or non-finite
    /// radius, [`NeighborError::InvalidRadius`].
    pub fn query_radius(&self, i: usize, radius: f64, window: usize) -> Result<Vec<Neighbor>, NeighborError> {
        self.check_index(i)?;
        check_radius(radius)?;
        let mut pairs = Vec::new();
        self.collect_within(i, radius, window, &mut pairs);
        let mut out = Vec::with_capacity(pairs.len());
        sort_and_take(&mut pairs, None, &mut out);
        Ok(out)
    }

    /// Calls `f(i, j, distance)` once for every pair `i < j` with
    /// `j - i > window` and `distance <= radius`.
    ///
    /// # Errors
    ///
    /// [`NeighborError::InvalidRadius`] for a negative or non-finite radius.
    pub fn for_each_pair_within<F>(&self, radius: f64, window: usize, mut f: F) -> Result<(), NeighborError>
    where
        F: FnMut(usize, usize, f64),
    {
        check_radius(radius)?;
        let m = self.len();
        let exclude_zero = self.config.exclude_coincident();
        let linear = self.prefers_linear_scan(radius);
        for i in 0..m {
            let mut visit = |j: usize| {
                if j <= i + window {
                    return;
                }
                let d = self.distance(i, j);
                if d <= radius && !(exclude_zero && d == 0.0) {
                    f(i, j, d);
                }
            };
            if linear {
                (i + window + 1..m).for_each(&mut visit);
            } else {
                self.for_each_candidate(i, radius, &mut visit);
            }
        }
        Ok(())
    }

    fn check_index(&self, i: usize) -> Result<(), NeighborError> {
        if i >= self.len() {
            return Err(NeighborError::IndexOutOfRange {
                index: i,
                len: self.len(),
            });
        }
        Ok(())
    }

    fn collect_within(&self, i: usize, radius: f64, window: usize, pairs: &mut Vec<(f64, usize)>) {
        let exclude_zero = self.config.exclude_coincident();
        let mut visit = |j: usize| {
            if !admissible(i, j, window) {
                return;
            }
            let d = self.distance(i, j);
            if d <= radius && !(exclude_zero && d == 0.0) {
                pairs.push((d, j));
            }
        };
        if self.prefers_linear_scan(radius) {
            (0..self.len()).for_each(&mut visit);
        } else {
            self.for_each_candidate(i, radius, &mut visit);
        }
    }

    /// Number of cells per axis a radius-`radius` query has to step over.
    fn span(&self, radius: f64) -> i64 {
        let steps = (radius / self.cell).ceil();
        if steps.is_finite() && steps < MAX_CELLS_PER_AXIS {
            steps as i64
        } else {
            MAX_CELLS_PER_AXIS as i64
        }
    }

    fn prefers_linear_scan(&self, radius: f64) -> bool {
        let side = (2 * self.span(radius) + 1) as f64;
        side.powi(self.grid_dims as i32) >= self.cells.len() as f64
    }

    fn for_each_candidate(&self, i: usize, radius: f64, visit: &mut impl FnMut(usize)) {
        let span = self.span(radius);
        let (cx, cy) = self.keys[i];
        let y_span = if self.grid_dims == 2 { span } else { 0 };
        for dx in -span..=span {
            for dy in -y_span..=y_span {
                if let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) {
                    bucket.iter().copied().for_each(&mut *visit);
                }
            }
        }
    }
}

fn cell_key(p: &[f64], origin: &[f64; 2], grid_dims: usize, cell: f64) -> CellKey {
    let axis = |c: usize| -> i64 {
        if c < grid_dims {
            ((p[c] - origin[c]) / cell).floor() as i64
        } else {
            0
        }
    };
    (axis(0), axis(1))
}

fn check_radius(radius: f64) -> Result<(), NeighborError> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(NeighborError::InvalidRadius { radius });
    }
    Ok(())
}
