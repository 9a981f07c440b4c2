//! Correlation dimension estimates from `C(r)`.

use chaoscope_stats::{ScalingConfig, ScalingRegion, detect_scaling_region, linear_fit};
use tracing::{debug, warn};

use crate::config::CorrelationConfig;
use crate::error::CorrelationError;
use crate::sum::{CorrelationSum, correlation_sum_embedded};

/// Correlation dimension read off a scaling region of `ln C` vs `ln r`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationDimension {
    /// The fitted region, indexing into the correlation sum it came from.
    pub region: ScalingRegion,
    /// Radii at the region's ends.
    pub r_range: (f64, f64),
    /// The slope, `D2`.
    pub dimension: f64,
}

/// Correlation dimension as the slope over the scaling region of
/// `(ln r, ln C(r))`.
///
/// # Errors
///
/// [`CorrelationError::NoScalingRegion`] when no window of the curve is
/// linear within the configured residual.
pub fn correlation_dimension(
    sum: &CorrelationSum,
    scaling: &ScalingConfig,
) -> Result<CorrelationDimension, CorrelationError> {
    let (lr, lc) = sum.log_log();
    let region = detect_scaling_region(&lr, &lc, scaling)
        .ok_or(CorrelationError::NoScalingRegion { points: sum.len() })?;
    Ok(CorrelationDimension {
        r_range: (sum.radii[region.start], sum.radii[region.end]),
        dimension: region.slope,
        region,
    })
}

/// One embedding dimension of [`correlation_dimensions`].
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationDimensionEntry {
    /// Embedding dimension.
    pub dimension: usize,
    /// The estimate, or why it could not be made.
    pub outcome: Result<CorrelationDimension, CorrelationError>,
}

/// Correlation dimension of the delay reconstruction of `x` at each
/// embedding dimension.
///
/// For stochastic data the estimate keeps growing with the embedding
/// dimension; for a low-dimensional attractor it saturates.
///
/// # Errors
///
/// A zero delay, an invalid configuration, or non-finite input fail the
/// whole call. Other failures are recorded per entry.
pub fn correlation_dimensions<I>(
    x: &[f64],
    dims: I,
    tau: usize,
    config: &CorrelationConfig,
    scaling: &ScalingConfig,
) -> Result<Vec<CorrelationDimensionEntry>, CorrelationError>
where
    I: IntoIterator<Item = usize>,
{
    let entries = correlation_sum_embedded(x, dims, tau, config)?;
    Ok(entries
        .into_iter()
        .map(|entry| {
            let outcome = entry
                .outcome
                .and_then(|sum| correlation_dimension(&sum, scaling));
            match &outcome {
                Ok(d2) => debug!(dimension = entry.dimension, d2 = d2.dimension, "correlation dimension"),
                Err(e) => warn!(dimension = entry.dimension, error = %e, "correlation dimension failed"),
            }
            CorrelationDimensionEntry {
                dimension: entry.dimension,
                outcome,
            }
        })
        .collect())
}

/// Local slopes `d ln C / d ln r`, each a least-squares fit over `2·hwin + 1`
/// consecutive points.
///
/// Returns `(r, slope)` at every radius with a full window on both sides,
/// so `len - 2·hwin` values; empty if the curve is shorter than one window.
pub fn local_slopes(radii: &[f64], sums: &[f64], hwin: usize) -> Result<Vec<(f64, f64)>, CorrelationError> {
    check_curve(radii, sums)?;
    if hwin == 0 {
        return Err(CorrelationError::InvalidHalfWindow { hwin });
    }
    let lr: Vec<f64> = radii.iter().map(|r| r.ln()).collect();
    let lc: Vec<f64> = sums.iter().map(|c| c.ln()).collect();
    let width = 2 * hwin + 1;
    if lr.len() < width {
        return Ok(Vec::new());
    }
    Ok((0..=lr.len() - width)
        .filter_map(|s| {
            let fit = linear_fit(&lr[s..s + width], &lc[s..s + width])?;
            Some((radii[s + hwin], fit.slope))
        })
        .collect())
}

/// Takens–Theiler maximum-likelihood estimate of `D2` as a function of the
/// upper cutoff radius.
///
/// `C(r)` is treated as a power law between consecutive radii, so the
/// estimator's integral `∫ C(s)/s ds` can be evaluated piecewise exactly.
/// Repeated values of `C` are collapsed to their first occurrence. When
/// `from_zero` is set, the first segment is extended down to `r = 0` with the
/// first power law and an estimate is returned at every radius; otherwise
/// the integral starts at the first radius and there is no estimate there.
pub fn takens_theiler(radii: &[f64], sums: &[f64], from_zero: bool) -> Result<Vec<(f64, f64)>, CorrelationError> {
    check_curve(radii, sums)?;
    let mut r = Vec::with_capacity(radii.len());
    let mut c = Vec::with_capacity(sums.len());
    for (&ri, &ci) in radii.iter().zip(sums) {
        if c.last() != Some(&ci) {
            r.push(ri);
            c.push(ci);
        }
    }
    if r.len() < 2 {
        return Ok(Vec::new());
    }

    let mut segments = Vec::with_capacity(r.len() - 1);
    for k in 0..r.len() - 1 {
        let (x1, x2) = (r[k].ln(), r[k + 1].ln());
        let (y1, y2) = (c[k].ln(), c[k + 1].ln());
        let a = (y2 - y1) / (x2 - x1);
        let b = (y1 * x2 - y2 * x1) / (x2 - x1);
        segments.push((a, b));
    }

    let mut out = Vec::with_capacity(r.len());
    let mut integral = 0.0;
    if from_zero {
        let (a0, b0) = segments[0];
        integral = b0.exp() / a0 * r[0].powf(a0);
        out.push((r[0], c[0] / integral));
    }
    for (k, &(a, b)) in segments.iter().enumerate() {
        integral += b.exp() / a * (r[k + 1].powf(a) - r[k].powf(a));
        out.push((r[k + 1], c[k + 1] / integral));
    }
    Ok(out)
}

fn check_curve(radii: &[f64], sums: &[f64]) -> Result<(), CorrelationError> {
    if radii.len() != sums.len() {
        return Err(CorrelationError::LengthMismatch {
            radii: radii.len(),
            sums: sums.len(),
        });
    }
    if let Some(&radius) = radii.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
        return Err(CorrelationError::InvalidRadius { radius });
    }
    if let Some(p) = radii.windows(2).position(|w| w[1] <= w[0]) {
        return Err(CorrelationError::UnsortedRadii {
            index: p + 1,
            radius: radii[p + 1],
        });
    }
    if let Some((index, &sum)) = sums.iter().enumerate().find(|(_, c)| !(c.is_finite() && **c > 0.0)) {
        return Err(CorrelationError::InvalidSum { index, sum });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Exact power law `C = 0.5 · r^2`.
    fn power_law(n: usize) -> (Vec<f64>, Vec<f64>) {
        let r: Vec<f64> = (0..n).map(|i| 0.01 * 1.2f64.powi(i as i32)).collect();
        let c = r.iter().map(|v| 0.5 * v * v).collect();
        (r, c)
    }

    #[test]
    fn local_slopes_of_a_power_law() {
        let (r, c) = power_law(12);
        let slopes = local_slopes(&r, &c, 2).unwrap();
        assert_eq!(slopes.len(), 8);
        assert_eq!(slopes[0].0, r[2]);
        for &(_, s) in &slopes {
            assert_relative_eq!(s, 2.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn local_slopes_short_and_invalid() {
        let (r, c) = power_law(4);
        assert!(local_slopes(&r, &c, 2).unwrap().is_empty());
        assert_eq!(
            local_slopes(&r, &c, 0),
            Err(CorrelationError::InvalidHalfWindow { hwin: 0 })
        );
        assert!(matches!(
            local_slopes(&r, &c[..3], 1),
            Err(CorrelationError::LengthMismatch { radii: 4, sums: 3 })
        ));
    }

    #[test]
    fn takens_theiler_recovers_exponent() {
        // For C = A r^D, the estimator C(r) / ∫_0^r C(s)/s ds equals D.
        let (r, c) = power_law(10);
        let from_zero = takens_theiler(&r, &c, true).unwrap();
        assert_eq!(from_zero.len(), 10);
        for &(_, d) in &from_zero {
            assert_relative_eq!(d, 2.0, epsilon = 1e-9);
        }

        // Starting the integral at r[0] overestimates D.
        let truncated = takens_theiler(&r, &c, false).unwrap();
        assert_eq!(truncated.len(), 9);
        assert_eq!(truncated[0].0, r[1]);
        for w in truncated.windows(2) {
            assert!(w[0].1 > w[1].1 && w[1].1 > 2.0);
        }
    }

    #[test]
    fn malformed_curves_are_rejected() {
        let c = vec![0.01, 0.04, 0.09];
        let err = takens_theiler(&[0.1, 0.2, 0.2], &c, true).unwrap_err();
        assert_eq!(err, CorrelationError::UnsortedRadii { index: 2, radius: 0.2 });
        assert_eq!(err.kind(), chaoscope_embed::ErrorKind::InvalidParameter);
        assert_eq!(
            local_slopes(&[0.3, 0.2, 0.1], &c, 1),
            Err(CorrelationError::UnsortedRadii { index: 1, radius: 0.2 })
        );
        assert_eq!(
            takens_theiler(&[0.1, 0.2, 0.3], &[0.01, 0.0, 0.09], false),
            Err(CorrelationError::InvalidSum { index: 1, sum: 0.0 })
        );
    }

    #[test]
    fn takens_theiler_skips_repeated_sums() {
        let r = vec![0.1, 0.2, 0.3, 0.4];
        let c = vec![0.01, 0.04, 0.04, 0.16];
        let est = takens_theiler(&r, &c, true).unwrap();
        let radii: Vec<f64> = est.iter().map(|&(r, _)| r).collect();
        assert_eq!(radii, vec![0.1, 0.2, 0.4]);
    }

    #[test]
    fn dimension_of_a_power_law() {
        let (r, c) = power_law(20);
        let sum = CorrelationSum {
            radii: r.clone(),
            sums: c,
            pairs: 100,
        };
        let d2 = correlation_dimension(&sum, &ScalingConfig::new()).unwrap();
        assert_relative_eq!(d2.dimension, 2.0, epsilon = 1e-9);
        assert_eq!(d2.region.start, 0);
        assert_eq!(d2.region.end, 19);
        assert_eq!(d2.r_range, (r[0], r[19]));
    }

    #[test]
    fn too_short_for_a_region() {
        let (r, c) = power_law(3);
        let sum = CorrelationSum {
            radii: r,
            sums: c,
            pairs: 10,
        };
        assert_eq!(
            correlation_dimension(&sum, &ScalingConfig::new()),
            Err(CorrelationError::NoScalingRegion { points: 3 })
        );
    }
}
