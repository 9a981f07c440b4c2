//! Histogram-based mutual information.

use chaoscope_stats::min_max;
use tracing::{debug, warn};

use crate::curve::{DelayCurve, DelayPoint};
use crate::error::{DelayError, check_finite};

/// Default histogram resolution per axis.
pub const DEFAULT_BINS: usize = 64;

/// Mutual information `I(x; y) = H(x) + H(y) - H(x, y)` in bits.
///
/// Probabilities come from equal-width histograms with `bins` bins spanning
/// each variable's own range; the maximum falls into the last bin.
///
/// # Errors
///
/// [`DelayError::LengthMismatch`], [`DelayError::SeriesTooShort`] for empty
/// input, [`DelayError::InvalidBins`], [`DelayError::NonFiniteInput`], and
/// [`DelayError::ZeroVariance`] when either variable is constant.
pub fn mutual_information(x: &[f64], y: &[f64], bins: usize) -> Result<f64, DelayError> {
    if x.len() != y.len() {
        return Err(DelayError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.is_empty() {
        return Err(DelayError::SeriesTooShort { len: 0, required: 1 });
    }
    if bins == 0 {
        return Err(DelayError::InvalidBins { bins });
    }
    check_finite(x)?;
    check_finite(y)?;

    let bx = bin_indices(x, bins)?;
    let by = bin_indices(y, bins)?;

    let mut px = vec![0usize; bins];
    let mut py = vec![0usize; bins];
    let mut pxy = vec![0usize; bins * bins];
    for (&i, &j) in bx.iter().zip(&by) {
        px[i] += 1;
        py[j] += 1;
        pxy[i * bins + j] += 1;
    }

    let total = x.len() as f64;
    Ok(entropy(&px, total) + entropy(&py, total) - entropy(&pxy, total))
}

/// Mutual information between `x_t` and `x_{t+lag}` for
/// `lag = 0..min(max_lag, N - 1)`.
///
/// The point at delay 0 is the histogram entropy of `x` itself. A lag whose
/// overlapping sub-series is constant is recorded as a failed point; the
/// rest of the curve is still computed.
///
/// # Errors
///
/// A zero `max_lag` or `bins`, fewer than two samples, non-finite input and
/// a constant series fail the whole call.
#[tracing::instrument(skip(x), fields(n = x.len()))]
pub fn delayed_mutual_information(x: &[f64], max_lag: usize, bins: usize) -> Result<DelayCurve, DelayError> {
    if max_lag == 0 {
        return Err(DelayError::InvalidMaxLag { max_lag });
    }
    let n = x.len();
    if n < 2 {
        return Err(DelayError::SeriesTooShort { len: n, required: 2 });
    }
    if bins == 0 {
        return Err(DelayError::InvalidBins { bins });
    }
    check_finite(x)?;
    bin_indices(x, bins)?;

    let lags = max_lag.min(n - 1);
    let points: Vec<DelayPoint> = (0..lags)
        .map(|delay| DelayPoint {
            delay,
            value: mutual_information(&x[..n - delay], &x[delay..], bins),
        })
        .collect();
    let curve = DelayCurve { points };
    if curve.failures() > 0 {
        warn!(failures = curve.failures(), "mutual information undefined at some lags");
    }
    debug!(lags, bins, "delayed mutual information");
    Ok(curve)
}

/// First local minimum of a curve: the first index `t >= 1` where the
/// discrete derivative changes from negative to non-negative.
///
/// Returns `None` when the curve never turns upward.
pub fn first_minimum(curve: &[f64]) -> Option<usize> {
    curve
        .windows(3)
        .position(|w| w[1] < w[0] && w[2] >= w[1])
        .map(|p| p + 1)
}

fn bin_indices(v: &[f64], bins: usize) -> Result<Vec<usize>, DelayError> {
    let (lo, hi) = min_max(v).ok_or(DelayError::SeriesTooShort { len: 0, required: 1 })?;
    let width = hi - lo;
    if width <= 0.0 {
        return Err(DelayError::ZeroVariance {
            statistic: "mutual information",
        });
    }
    let scale = bins as f64 / width;
    Ok(v.iter()
        .map(|&a| (((a - lo) * scale).floor() as usize).min(bins - 1))
        .collect())
}

/// Shannon entropy (bits) of a histogram with `total` observations.
fn entropy(counts: &[usize], total: f64) -> f64 {
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}
