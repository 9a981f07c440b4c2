//! Maximal Lyapunov exponent from the slope of the divergence curve.

use chaoscope_embed::EmbeddedTrajectory;
use chaoscope_stats::{ScalingRegion, detect_scaling_region, linear_fit};
use tracing::debug;

use crate::config::{FitWindow, LyapunovConfig};
use crate::divergence::{DivergenceCurve, divergence};
use crate::error::LyapunovError;

/// Divergence curve together with the line fitted to its linear part.
#[derive(Debug, Clone, PartialEq)]
pub struct LyapunovEstimate {
    /// The mean log-divergence curve.
    pub curve: DivergenceCurve,
    /// The fitted stretch of the curve.
    pub region: ScalingRegion,
    /// Slope of the fit, per sample.
    pub exponent: f64,
}

/// Fits a line to the divergence curve over the chosen window.
///
/// # Errors
///
/// [`LyapunovError::InvalidFitWindow`] when a fixed window does not fit in
/// the curve, [`LyapunovError::NoScalingRegion`] when auto-detection finds
/// nothing linear.
pub fn fit_divergence(curve: &DivergenceCurve, fit: &FitWindow) -> Result<ScalingRegion, LyapunovError> {
    let t = curve.steps_f64();
    let d = &curve.mean_log_divergence;
    match fit {
        FitWindow::Fixed { start, end } => {
            let (start, end) = (*start, *end);
            let invalid = LyapunovError::InvalidFitWindow {
                start,
                end,
                len: curve.len(),
            };
            if end <= start || end >= curve.len() {
                return Err(invalid);
            }
            let line = linear_fit(&t[start..=end], &d[start..=end]).ok_or(invalid)?;
            Ok(ScalingRegion {
                start,
                end,
                slope: line.slope,
                intercept: line.intercept,
                residual: line.residual,
            })
        }
        FitWindow::Auto(scaling) => {
            detect_scaling_region(&t, d, scaling).ok_or(LyapunovError::NoScalingRegion { steps: curve.len() })
        }
    }
}

/// Maximal Lyapunov exponent of an embedded trajectory (Rosenstein et al.).
///
/// The result is in units of inverse samples; divide by the sampling
/// interval for inverse time.
///
/// # Errors
///
/// Any error of [`divergence`] or [`fit_divergence`].
#[tracing::instrument(skip(traj, config), fields(points = traj.len(), dim = traj.dim()))]
pub fn max_lyapunov(traj: &EmbeddedTrajectory, config: &LyapunovConfig) -> Result<LyapunovEstimate, LyapunovError> {
    let curve = divergence(traj, config)?;
    let region = fit_divergence(&curve, config.fit())?;
    debug!(
        start = region.start,
        end = region.end,
        exponent = region.slope,
        "maximal Lyapunov exponent"
    );
    Ok(LyapunovEstimate {
        exponent: region.slope,
        region,
        curve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chaoscope_stats::ScalingConfig;

    fn curve(values: Vec<f64>) -> DivergenceCurve {
        DivergenceCurve {
            steps: (0..values.len()).collect(),
            pair_counts: vec![10; values.len()],
            mean_log_divergence: values,
        }
    }

    /// Linear growth at 0.5 per step for 12 steps, then flat.
    fn saturating() -> DivergenceCurve {
        curve((0..30).map(|t| -6.0 + 0.5 * (t.min(12) as f64)).collect())
    }

    #[test]
    fn fixed_window() {
        let region = fit_divergence(&saturating(), &FitWindow::Fixed { start: 2, end: 8 }).unwrap();
        assert_relative_eq!(region.slope, 0.5, epsilon = 1e-12);
        assert_relative_eq!(region.intercept, -6.0, epsilon = 1e-12);
        assert_eq!((region.start, region.end), (2, 8));
    }

    #[test]
    fn fixed_window_out_of_range() {
        assert_eq!(
            fit_divergence(&saturating(), &FitWindow::Fixed { start: 20, end: 30 }),
            Err(LyapunovError::InvalidFitWindow { start: 20, end: 30, len: 30 })
        );
    }

    #[test]
    fn auto_window_skips_the_plateau() {
        // The plateau is longer than the linear part but flatter than half
        // the steepest slope.
        let region = fit_divergence(&saturating(), &FitWindow::default()).unwrap();
        assert_relative_eq!(region.slope, 0.5, epsilon = 1e-9);
        assert_eq!(region.start, 0);
        assert!(region.end <= 12);

        // Without the slope floor the plateau wins.
        let plain = fit_divergence(&saturating(), &FitWindow::Auto(ScalingConfig::new())).unwrap();
        assert!(plain.slope.abs() < 1e-9);
    }
}
