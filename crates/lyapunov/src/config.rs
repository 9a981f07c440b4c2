//! Configuration for divergence tracking and exponent fitting.

use chaoscope_neighbors::Metric;
use chaoscope_stats::ScalingConfig;

use crate::error::LyapunovError;

/// How the linear part of the divergence curve is chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum FitWindow {
    /// Steps `start..=end`, inclusive.
    Fixed {
        /// First step.
        start: usize,
        /// Last step.
        end: usize,
    },
    /// The longest scaling region of the curve.
    Auto(ScalingConfig),
}

impl Default for FitWindow {
    /// Auto-detection that ignores windows flatter than half the steepest
    /// one, so the saturated tail never wins.
    fn default() -> Self {
        FitWindow::Auto(ScalingConfig::new().with_min_relative_slope(0.5))
    }
}

/// Parameters for [`divergence`](crate::divergence) and
/// [`max_lyapunov`](crate::max_lyapunov).
///
/// # Example
///
/// ```
/// use chaoscope_lyapunov::{FitWindow, LyapunovConfig};
///
/// let config = LyapunovConfig::new(40)
///     .with_window(20)
///     .with_fit(FitWindow::Fixed { start: 0, end: 10 });
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LyapunovConfig {
    /// Maximum number of steps to follow each pair.
    horizon: usize,
    /// Theiler window.
    window: usize,
    /// Distance metric.
    metric: Metric,
    /// Fit window selection.
    fit: FitWindow,
}

impl LyapunovConfig {
    /// Creates a configuration that tracks pairs for `horizon` steps.
    ///
    /// Defaults: `window = 10`, Euclidean metric, automatic fit window.
    pub fn new(horizon: usize) -> Self {
        Self {
            horizon,
            window: 10,
            metric: Metric::Euclidean,
            fit: FitWindow::default(),
        }
    }

    /// Sets the Theiler window.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Sets the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Sets how the fit window is chosen.
    pub fn with_fit(mut self, fit: FitWindow) -> Self {
        self.fit = fit;
        self
    }

    /// Returns the horizon.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Returns the Theiler window.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Returns the metric.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the fit window selection.
    pub fn fit(&self) -> &FitWindow {
        &self.fit
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), LyapunovError> {
        if self.horizon == 0 {
            return Err(LyapunovError::InvalidHorizon { horizon: 0 });
        }
        if let FitWindow::Fixed { start, end } = self.fit
            && end <= start
        {
            return Err(LyapunovError::InvalidFitWindow {
                start,
                end,
                len: self.horizon,
            });
        }
        Ok(())
    }
}

impl Default for LyapunovConfig {
    fn default() -> Self {
        Self::new(500)
    }
}
