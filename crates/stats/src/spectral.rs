//! Real-input FFT helpers over `rustfft`.
//!
//! `rustfft` works on complex buffers of the full length; these helpers
//! expose the one-sided (`n/2 + 1` bins) view used throughout the crate and
//! apply the `1/n` normalization on the inverse (rustfft is unnormalized).

use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// A planned forward/inverse real FFT pair of a fixed length.
///
/// Plan once and reuse inside iterative algorithms (IAAFT runs hundreds of
/// transforms of the same length).
#[derive(Clone)]
pub struct RealFft {
    n: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    buffer: Vec<Complex<f64>>,
}

impl std::fmt::Debug for RealFft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealFft").field("n", &self.n).finish()
    }
}

impl RealFft {
    /// Plans transforms of length `n`.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "RealFft: length must be positive");
        let mut planner = FftPlanner::new();
        Self {
            n,
            forward: planner.plan_fft_forward(n),
            inverse: planner.plan_fft_inverse(n),
            buffer: vec![Complex::new(0.0, 0.0); n],
        }
    }

    /// Transform length.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always `false`: a planned transform has positive length.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of one-sided frequency bins, `n/2 + 1`.
    pub fn n_bins(&self) -> usize {
        self.n / 2 + 1
    }

    /// One-sided forward transform of `x`.
    ///
    /// Inputs shorter than the planned length are zero-padded; longer inputs
    /// are truncated.
    pub fn forward(&mut self, x: &[f64]) -> Vec<Complex<f64>> {
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            *slot = Complex::new(x.get(i).copied().unwrap_or(0.0), 0.0);
        }
        self.forward.process(&mut self.buffer);
        self.buffer[..self.n_bins()].to_vec()
    }

    /// Inverse of a one-sided spectrum, returning a real series of the
    /// planned length.
    ///
    /// The negative-frequency half is rebuilt by conjugate symmetry, so the
    /// imaginary parts of the DC and (even `n`) Nyquist bins are ignored.
    pub fn inverse(&mut self, half: &[Complex<f64>]) -> Vec<f64> {
        debug_assert_eq!(half.len(), self.n_bins());
        let n = self.n;
        for (k, slot) in self.buffer.iter_mut().enumerate() {
            *slot = if k < half.len() {
                half[k]
            } else {
                half[n - k].conj()
            };
        }
        self.inverse.process(&mut self.buffer);
        let norm = 1.0 / n as f64;
        self.buffer.iter().map(|c| c.re * norm).collect()
    }
}

/// One-sided spectrum of `x` (`x.len()/2 + 1` bins).
///
/// Returns an empty vector for empty input.
pub fn rfft(x: &[f64]) -> Vec<Complex<f64>> {
    if x.is_empty() {
        return Vec::new();
    }
    RealFft::new(x.len()).forward(x)
}

/// Real series of length `n` whose one-sided spectrum is `half`.
pub fn irfft(half: &[Complex<f64>], n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    RealFft::new(n).inverse(half)
}
