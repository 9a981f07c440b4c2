//! Ordinary least-squares line fits.

/// Result of fitting `y = slope * x + intercept` by least squares.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
    /// Fitted slope.
    pub slope: f64,
    /// Fitted intercept.
    pub intercept: f64,
    /// Root-mean-square of the fit residuals.
    pub residual: f64,
}

impl LinearFit {
    /// Evaluates the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits a straight line to `(x[i], y[i])` by least squares.
///
/// Returns `None` when fewer than two points are given, the lengths differ,
/// any value is non-finite, or all `x` coincide (vertical line).
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    let n = x.len();
    if n < 2 || y.len() != n {
        return None;
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let nf = n as f64;
    let mx = x.iter().sum::<f64>() / nf;
    let my = y.iter().sum::<f64>() / nf;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mx;
        sxx += dx * dx;
        sxy += dx * (yi - my);
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = my - slope * mx;
    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let r = yi - (slope * xi + intercept);
            r * r
        })
        .sum();

    Some(LinearFit {
        slope,
        intercept,
        residual: (ss_res / nf).sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let fit = linear_fit(&x, &y).unwrap();
        assert_abs_diff_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.intercept, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.residual, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.predict(10.0), 21.0, epsilon = 1e-12);
    }

    #[test]
    fn noisy_line_has_residual() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 1.0, 0.0];
        let fit = linear_fit(&x, &y).unwrap();
        assert_abs_diff_eq!(fit.slope, 0.0, epsilon = 1e-12);
        // residuals: -1/3, 2/3, -1/3 => rms = sqrt(6/27)
        assert_abs_diff_eq!(fit.residual, (6.0_f64 / 27.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(linear_fit(&[1.0], &[1.0]).is_none());
        assert!(linear_fit(&[1.0, 2.0], &[1.0]).is_none());
        assert!(linear_fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).is_none());
        assert!(linear_fit(&[0.0, 1.0], &[f64::NAN, 1.0]).is_none());
    }
}
