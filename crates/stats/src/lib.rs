//! Numeric helper functions shared by the chaoscope estimators.
//!
//! | Module | Contents |
//! |--------|----------|
//! | (root) | moments, extrema, rank ordering |
//! | [`fit`] | ordinary least-squares line fits |
//! | [`scaling`] | scaling-region detection on log-log / log-linear curves |
//! | [`spectral`] | real-input FFT helpers over `rustfft` |

pub mod fit;
pub mod scaling;
pub mod spectral;

pub use fit::{LinearFit, linear_fit};
pub use scaling::{ScalingConfig, ScalingRegion, detect_scaling_region};
pub use spectral::{RealFft, irfft, rfft};

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sample variance with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0)
}

/// Population standard deviation (N denominator). Returns 0.0 if empty.
///
/// This is the scale used by the false-nearest-neighbor boundedness test.
pub fn population_sd(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    let ss: f64 = data.iter().map(|&x| (x - m) * (x - m)).sum();
    (ss / data.len() as f64).sqrt()
}

/// Minimum and maximum of a slice, or `None` if empty.
///
/// NaN values are ignored unless the slice holds nothing else.
pub fn min_max(data: &[f64]) -> Option<(f64, f64)> {
    let first = *data.first()?;
    Some(
        data.iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Rank of every element (0 = smallest).
///
/// Ties are broken by position, so the result is always a permutation of
/// `0..data.len()`. This is the double-argsort used for rank-order matching.
pub fn ranks(data: &[f64]) -> Vec<usize> {
    let order = argsort(data);
    let mut ranks = vec![0usize; data.len()];
    for (rank, &idx) in order.iter().enumerate() {
        ranks[idx] = rank;
    }
    ranks
}

/// Indices that sort `data` ascending (stable; NaN-safe via `total_cmp`).
pub fn argsort(data: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));
    order
}

/// Returns a sorted copy of `data`.
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut out = data.to_vec();
    out.sort_by(f64::total_cmp);
    out
}
