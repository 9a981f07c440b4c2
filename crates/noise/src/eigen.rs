//! Symmetric eigen-decomposition by cyclic Jacobi rotations.
//!
//! Sized for local covariance matrices (a handful to a few dozen rows), where
//! Jacobi is simple and accurate.

use ndarray::{Array1, Array2};

use crate::error::NoiseError;

const MAX_SWEEPS: usize = 64;

/// Eigenvalues (descending) and matching unit eigenvectors (as columns) of a
/// symmetric matrix.
///
/// Only the upper triangle of `a` is read.
pub(crate) fn symmetric_eigen(a: &Array2<f64>) -> Result<(Array1<f64>, Array2<f64>), NoiseError> {
    let n = a.nrows();
    let mut m = a.clone();
    for i in 0..n {
        for j in 0..i {
            m[[i, j]] = m[[j, i]];
        }
    }
    let mut v = Array2::<f64>::eye(n);

    let scale: f64 = m.iter().map(|x| x * x).sum();
    let tol = scale * 1e-28;
    let mut converged = n < 2;
    for _ in 0..MAX_SWEEPS {
        if converged {
            break;
        }
        let mut off = 0.0;
        for p in 0..n {
            for q in p + 1..n {
                off += m[[p, q]] * m[[p, q]];
            }
        }
        if off <= tol {
            converged = true;
            break;
        }
        for p in 0..n {
            for q in p + 1..n {
                let apq = m[[p, q]];
                if apq == 0.0 {
                    continue;
                }
                let theta = (m[[q, q]] - m[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;
                rotate(&mut m, &mut v, p, q, c, s);
            }
        }
    }
    if !converged {
        return Err(NoiseError::EigenNonConvergence { sweeps: MAX_SWEEPS });
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| m[[j, j]].total_cmp(&m[[i, i]]));
    let values = Array1::from_iter(order.iter().map(|&k| m[[k, k]]));
    let mut vectors = Array2::<f64>::zeros((n, n));
    for (dst, &src) in order.iter().enumerate() {
        vectors.column_mut(dst).assign(&v.column(src));
    }
    Ok((values, vectors))
}

/// Applies the rotation that zeroes `m[p, q]`, and accumulates it into `v`.
fn rotate(m: &mut Array2<f64>, v: &mut Array2<f64>, p: usize, q: usize, c: f64, s: f64) {
    let n = m.nrows();
    for k in 0..n {
        let mkp = m[[k, p]];
        let mkq = m[[k, q]];
        m[[k, p]] = c * mkp - s * mkq;
        m[[k, q]] = s * mkp + c * mkq;
    }
    for k in 0..n {
        let mpk = m[[p, k]];
        let mqk = m[[q, k]];
        m[[p, k]] = c * mpk - s * mqk;
        m[[q, k]] = s * mpk + c * mqk;
    }
    for k in 0..n {
        let vkp = v[[k, p]];
        let vkq = v[[k, q]];
        v[[k, p]] = c * vkp - s * vkq;
        v[[k, q]] = s * vkp + c * vkq;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn two_by_two() {
        let a = array![[2.0, 1.0], [1.0, 2.0]];
        let (values, vectors) = symmetric_eigen(&a).unwrap();
        assert_abs_diff_eq!(values[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(values[1], 1.0, epsilon = 1e-12);
        let v0 = vectors.column(0);
        assert_abs_diff_eq!(v0[0].abs(), 0.5f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(v0[0], v0[1], epsilon = 1e-12);
    }

    #[test]
    fn diagonal_is_sorted() {
        let a = array![[1.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 3.0]];
        let (values, vectors) = symmetric_eigen(&a).unwrap();
        assert_eq!(values.to_vec(), vec![5.0, 3.0, 1.0]);
        assert_abs_diff_eq!(vectors[[1, 0]].abs(), 1.0);
    }

    #[test]
    fn decomposition_reconstructs_matrix() {
        let a = array![
            [4.0, 1.0, -2.0, 0.5],
            [1.0, 3.0, 0.0, 1.5],
            [-2.0, 0.0, 5.0, -1.0],
            [0.5, 1.5, -1.0, 2.0]
        ];
        let (values, vectors) = symmetric_eigen(&a).unwrap();
        for w in values.windows(2) {
            assert!(w[0] >= w[1]);
        }
        let lambda = Array2::from_diag(&values);
        let rebuilt = vectors.dot(&lambda).dot(&vectors.t());
        for (x, y) in rebuilt.iter().zip(a.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-10);
        }
        let gram = vectors.t().dot(&vectors);
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(gram[[i, j]], expected, epsilon = 1e-10);
            }
        }
    }
}
