//! Average displacement from the diagonal (Rosenstein et al. 1994).

use chaoscope_embed::embed;

use crate::error::DelayError;

/// Mean Euclidean distance of the delay vectors from the phase-space
/// diagonal, for `tau = 0..min(max_tau, N / dim)`.
///
/// The displacement of `(x_i, x_{i+tau}, ...)` is measured against
/// `(x_i, x_i, ...)`. Entry 0 is zero. The curve rises with `tau` as the
/// reconstruction unfolds and levels off; a delay near the start of the
/// plateau is a common choice.
pub fn adfd(x: &[f64], dim: usize, max_tau: usize) -> Result<Vec<f64>, DelayError> {
    if dim == 0 {
        return Err(chaoscope_embed::EmbedError::InvalidDimension { dim }.into());
    }
    if max_tau == 0 {
        return Err(DelayError::InvalidMaxLag { max_lag: max_tau });
    }
    let n = x.len();
    let limit = max_tau.min(n / dim);
    if limit == 0 {
        return Err(DelayError::SeriesTooShort { len: n, required: dim });
    }

    let mut disp = vec![0.0; limit];
    for (tau, slot) in disp.iter_mut().enumerate().skip(1) {
        let traj = embed(x, tau, dim)?;
        let total: f64 = traj
            .points()
            .map(|p| p.iter().map(|&v| (v - p[0]) * (v - p[0])).sum::<f64>().sqrt())
            .sum();
        *slot = total / traj.len() as f64;
    }
    Ok(disp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_ramp() {
        // x_i = i: displacement of (i, i + tau) from the diagonal is tau.
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let d = adfd(&x, 2, 6).unwrap();
        assert_eq!(d.len(), 6);
        assert_abs_diff_eq!(d[0], 0.0);
        for (tau, &v) in d.iter().enumerate() {
            assert_abs_diff_eq!(v, tau as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn dimension_one_is_flat() {
        let x: Vec<f64> = (0..20).map(|i| (i as f64).sin()).collect();
        assert!(adfd(&x, 1, 5).unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn limited_by_series_length() {
        let x = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0];
        assert_eq!(adfd(&x, 3, 100).unwrap().len(), 2);
        assert!(adfd(&x, 0, 3).is_err());
    }
}
