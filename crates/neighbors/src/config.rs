//! Configuration for neighbor index construction and radius expansion.

use crate::error::NeighborError;
use crate::metric::Metric;

/// Configuration for a [`NeighborIndex`](crate::NeighborIndex).
///
/// A k-nearest query starts at the initial radius and, while fewer than k
/// admissible points lie within it, multiplies the radius by `growth`. It
/// gives up with [`NeighborError::InsufficientNeighbors`] once the radius
/// covers the whole trajectory or `max_expansions` growth steps have been
/// taken.
///
/// # Example
///
/// ```
/// use chaoscope_neighbors::{Metric, NeighborConfig};
///
/// let config = NeighborConfig::new(Metric::Euclidean)
///     .with_initial_radius(0.1)
///     .with_growth(1.5)
///     .with_max_expansions(20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborConfig {
    /// Distance metric.
    metric: Metric,
    /// Starting search radius and grid cell size. `None` derives it from the
    /// trajectory extent and point count.
    initial_radius: Option<f64>,
    /// Geometric radius growth factor.
    growth: f64,
    /// Maximum number of radius expansions per query.
    max_expansions: usize,
    /// Skip neighbors at distance exactly zero.
    exclude_coincident: bool,
}

impl NeighborConfig {
    /// Creates a configuration for the given metric.
    ///
    /// Defaults: automatic initial radius, `growth = 2.0`,
    /// `max_expansions = 32`, coincident points admitted.
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            initial_radius: None,
            growth: 2.0,
            max_expansions: 32,
            exclude_coincident: false,
        }
    }

    /// Sets the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Fixes the starting radius (and grid cell size).
    pub fn with_initial_radius(mut self, radius: f64) -> Self {
        self.initial_radius = Some(radius);
        self
    }

    /// Sets the geometric growth factor applied on each expansion.
    pub fn with_growth(mut self, growth: f64) -> Self {
        self.growth = growth;
        self
    }

    /// Sets the maximum number of radius expansions.
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Skips neighbors at distance zero (duplicated states).
    ///
    /// Enable for estimators that divide by or take logarithms of neighbor
    /// distances.
    pub fn with_exclude_coincident(mut self, exclude: bool) -> Self {
        self.exclude_coincident = exclude;
        self
    }

    /// Returns the metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the fixed initial radius, if any.
    pub fn initial_radius(&self) -> Option<f64> {
        self.initial_radius
    }

    /// Returns the growth factor.
    pub fn growth(&self) -> f64 {
        self.growth
    }

    /// Returns the maximum number of expansions.
    pub fn max_expansions(&self) -> usize {
        self.max_expansions
    }

    /// Returns whether zero-distance neighbors are skipped.
    pub fn exclude_coincident(&self) -> bool {
        self.exclude_coincident
    }

    /// Validates this configuration.
    ///
    /// Returns an error if the initial radius is non-finite or non-positive,
    /// or the growth factor is not a finite value above one.
    pub fn validate(&self) -> Result<(), NeighborError> {
        if let Some(radius) = self.initial_radius
            && (!radius.is_finite() || radius <= 0.0)
        {
            return Err(NeighborError::InvalidRadius { radius });
        }
        if !self.growth.is_finite() || self.growth <= 1.0 {
            return Err(NeighborError::InvalidGrowth {
                growth: self.growth,
            });
        }
        Ok(())
    }
}

impl Default for NeighborConfig {
    fn default() -> Self {
        Self::new(Metric::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = NeighborConfig::default();
        assert_eq!(config.metric(), Metric::Chebyshev);
        assert_eq!(config.initial_radius(), None);
        assert_eq!(config.growth(), 2.0);
        assert_eq!(config.max_expansions(), 32);
        assert!(!config.exclude_coincident());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_radius() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = NeighborConfig::default().with_initial_radius(radius);
            assert!(matches!(
                config.validate(),
                Err(NeighborError::InvalidRadius { .. })
            ));
        }
    }

    #[test]
    fn rejects_bad_growth() {
        for growth in [1.0, 0.5, f64::NAN] {
            let config = NeighborConfig::default().with_growth(growth);
            assert!(matches!(
                config.validate(),
                Err(NeighborError::InvalidGrowth { .. })
            ));
        }
    }
}
