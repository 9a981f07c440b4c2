//! Configuration for correlation-sum computations.

use chaoscope_neighbors::Metric;

use crate::error::CorrelationError;
use crate::range::GeometricRange;

/// Default number of geometrically spaced radii.
pub const DEFAULT_NUM_RADII: usize = 100;

/// Ratio between the trajectory extent and the smallest automatic radius.
pub const AUTO_RANGE_DECADES: f64 = 1000.0;

/// Which radii to evaluate the correlation sum at.
#[derive(Debug, Clone, PartialEq)]
pub enum Radii {
    /// `num` geometrically spaced radii. Absent bounds are filled from the
    /// trajectory: `r_min = extent / 1000`, `r_max = extent`.
    Geometric {
        /// Smallest radius.
        r_min: Option<f64>,
        /// Largest radius.
        r_max: Option<f64>,
        /// Number of radii.
        num: usize,
    },
    /// An explicit list, evaluated in ascending order.
    Explicit(Vec<f64>),
}

impl Default for Radii {
    fn default() -> Self {
        Radii::Geometric {
            r_min: None,
            r_max: None,
            num: DEFAULT_NUM_RADII,
        }
    }
}

impl Radii {
    /// Resolves to a sorted radius list for a trajectory of the given
    /// extent.
    pub fn resolve(&self, extent: f64) -> Result<Vec<f64>, CorrelationError> {
        match self {
            Radii::Geometric { r_min, r_max, num } => {
                let hi = match r_max {
                    Some(r) => *r,
                    None if extent > 0.0 => extent,
                    None => return Err(CorrelationError::ZeroExtent),
                };
                let lo = match r_min {
                    Some(r) => *r,
                    None if extent > 0.0 => extent / AUTO_RANGE_DECADES,
                    None => return Err(CorrelationError::ZeroExtent),
                };
                Ok(GeometricRange::new(lo, hi, *num)?.to_vec())
            }
            Radii::Explicit(list) => {
                if list.is_empty() {
                    return Err(CorrelationError::NoRadii);
                }
                if let Some(&radius) = list.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
                    return Err(CorrelationError::InvalidRadius { radius });
                }
                let mut sorted = list.clone();
                sorted.sort_by(f64::total_cmp);
                sorted.dedup();
                Ok(sorted)
            }
        }
    }

    fn validate(&self) -> Result<(), CorrelationError> {
        match self {
            Radii::Geometric { r_min, r_max, num } => {
                if *num < 2 {
                    return Err(CorrelationError::InvalidRadiusCount { num: *num });
                }
                for r in [r_min, r_max].into_iter().flatten() {
                    if !(r.is_finite() && *r > 0.0) {
                        return Err(CorrelationError::InvalidRadius { radius: *r });
                    }
                }
                if let (Some(lo), Some(hi)) = (r_min, r_max)
                    && lo >= hi
                {
                    return Err(CorrelationError::InvalidRadiusRange { r_min: *lo, r_max: *hi });
                }
                Ok(())
            }
            Radii::Explicit(_) => self.resolve(1.0).map(|_| ()),
        }
    }
}

/// Parameters for the correlation sum.
///
/// # Example
///
/// ```
/// use chaoscope_correlation::CorrelationConfig;
/// use chaoscope_neighbors::Metric;
///
/// let config = CorrelationConfig::new()
///     .with_metric(Metric::Euclidean)
///     .with_window(20)
///     .with_radius_range(0.01, 1.0)
///     .with_num_radii(40);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationConfig {
    /// Distance metric.
    metric: Metric,
    /// Theiler window.
    window: usize,
    /// Radii to evaluate.
    radii: Radii,
}

impl CorrelationConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: Chebyshev metric, `window = 10`, 100 automatic radii.
    pub fn new() -> Self {
        Self {
            metric: Metric::Chebyshev,
            window: 10,
            radii: Radii::default(),
        }
    }

    /// Sets the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Sets the Theiler window.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Sets the number of geometrically spaced radii.
    ///
    /// Replaces an explicit radius list with automatic bounds.
    pub fn with_num_radii(mut self, num: usize) -> Self {
        self.radii = match self.radii {
            Radii::Geometric { r_min, r_max, .. } => Radii::Geometric { r_min, r_max, num },
            Radii::Explicit(_) => Radii::Geometric {
                r_min: None,
                r_max: None,
                num,
            },
        };
        self
    }

    /// Sets both bounds of the geometric radius range.
    pub fn with_radius_range(self, r_min: f64, r_max: f64) -> Self {
        self.with_radius_bounds(Some(r_min), Some(r_max))
    }

    /// Sets the bounds of the geometric radius range; `None` derives that
    /// bound from the trajectory extent.
    pub fn with_radius_bounds(mut self, r_min: Option<f64>, r_max: Option<f64>) -> Self {
        let num = match self.radii {
            Radii::Geometric { num, .. } => num,
            Radii::Explicit(_) => DEFAULT_NUM_RADII,
        };
        self.radii = Radii::Geometric { r_min, r_max, num };
        self
    }

    /// Evaluates at exactly these radii.
    pub fn with_radii(mut self, radii: Vec<f64>) -> Self {
        self.radii = Radii::Explicit(radii);
        self
    }

    /// Returns the metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the Theiler window.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Returns the radius settings.
    pub fn radii(&self) -> &Radii {
        &self.radii
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), CorrelationError> {
        self.radii.validate()
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self::new()
    }
}
