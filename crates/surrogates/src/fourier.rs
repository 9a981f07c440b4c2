//! Phase-randomized (FT) and amplitude-adjusted (AAFT) surrogates, and the
//! power spectrum used to compare them with the original.

use std::f64::consts::PI;

use chaoscope_embed::TimeSeries;
use chaoscope_stats::{RealFft, ranks, sorted};
use num_complex::Complex;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::SurrogateError;

/// Multiplies every bin except DC and (even length) Nyquist by a uniform
/// random phase, then inverts.
pub(crate) fn phase_randomized<R>(fft: &mut RealFft, x: &[f64], rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    let n = fft.len();
    let nyquist = (n % 2 == 0).then_some(n / 2);
    let mut spectrum = fft.forward(x);
    for (k, bin) in spectrum.iter_mut().enumerate().skip(1) {
        if Some(k) == nyquist {
            continue;
        }
        let phi = 2.0 * PI * rng.random::<f64>();
        *bin *= Complex::from_polar(1.0, phi);
    }
    fft.inverse(&spectrum)
}

/// `reference_sorted[rank of order[i]]` for every `i`: the values of
/// `reference_sorted` arranged in the rank order of `order`.
pub(crate) fn rank_remap(reference_sorted: &[f64], order: &[f64]) -> Vec<f64> {
    ranks(order).into_iter().map(|r| reference_sorted[r]).collect()
}

/// Fourier-transform surrogate.
///
/// Keeps the magnitude of every frequency bin and draws each phase
/// uniformly, so the surrogate has exactly the power spectrum (and hence
/// the autocorrelation) of `x` but a Gaussian-looking amplitude
/// distribution. DC and Nyquist bins stay real.
///
/// # Errors
///
/// Empty or non-finite input.
pub fn ft<R>(x: &[f64], rng: &mut R) -> Result<Vec<f64>, SurrogateError>
where
    R: Rng + ?Sized,
{
    TimeSeries::validate(x)?;
    let mut fft = RealFft::new(x.len());
    Ok(phase_randomized(&mut fft, x, rng))
}

/// Amplitude-adjusted Fourier-transform surrogate.
///
/// A Gaussian sequence is put in the rank order of `x`, phase-randomized,
/// and the values of `x` are then put in the rank order of the result. The
/// output is a permutation of `x`; its spectrum matches only approximately.
///
/// # Errors
///
/// Empty or non-finite input.
pub fn aaft<R>(x: &[f64], rng: &mut R) -> Result<Vec<f64>, SurrogateError>
where
    R: Rng + ?Sized,
{
    TimeSeries::validate(x)?;
    let mut fft = RealFft::new(x.len());
    Ok(aaft_with(&mut fft, x, &sorted(x), rng))
}

pub(crate) fn aaft_with<R>(fft: &mut RealFft, x: &[f64], x_sorted: &[f64], rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    let gaussian: Vec<f64> = (0..x.len()).map(|_| StandardNormal.sample(rng)).collect();
    let gaussian = rank_remap(&sorted(&gaussian), x);
    let shuffled = phase_randomized(fft, &gaussian, rng);
    rank_remap(x_sorted, &shuffled)
}

/// One-sided power spectrum of a series assumed periodic.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSpectrum {
    /// Frequencies `k / (n·dt)` for `k = 0..=n/2`.
    pub frequencies: Vec<f64>,
    /// Power per frequency; sums to the mean square of the series.
    pub power: Vec<f64>,
}

/// Power spectrum without windowing or averaging.
///
/// Non-DC bins are doubled to account for the negative frequencies (except
/// the Nyquist bin of an even-length series), so the total power equals
/// `mean(x²)` (Parseval).
///
/// # Errors
///
/// Empty or non-finite input and a non-positive `dt`.
pub fn power_spectrum(x: &[f64], dt: f64) -> Result<PowerSpectrum, SurrogateError> {
    TimeSeries::validate(x)?;
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SurrogateError::InvalidSamplingInterval { dt });
    }
    let n = x.len();
    let spectrum = RealFft::new(n).forward(x);
    let scale = 1.0 / (n as f64 * n as f64);
    let last = spectrum.len() - 1;
    let power = spectrum
        .iter()
        .enumerate()
        .map(|(k, c)| {
            let single = k == 0 || (k == last && n % 2 == 0);
            let factor = if single { 1.0 } else { 2.0 };
            factor * c.norm_sqr() * scale
        })
        .collect();
    let frequencies = (0..spectrum.len()).map(|k| k as f64 / (n as f64 * dt)).collect();
    Ok(PowerSpectrum { frequencies, power })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chaoscope_stats::rfft;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n).map(|_| 1.0 + rng.random::<f64>()).collect()
    }

    #[test]
    fn ft_keeps_every_magnitude() {
        for n in [256, 243] {
            let x = sample(n, 5);
            let y = ft(&x, &mut StdRng::seed_from_u64(9)).unwrap();
            assert_eq!(y.len(), n);
            for (a, b) in rfft(&x).iter().zip(rfft(&y)) {
                assert_abs_diff_eq!(a.norm(), b.norm(), epsilon = 1e-9);
            }
            assert_ne!(x, y);
        }
    }

    #[test]
    fn aaft_is_a_permutation() {
        let x = sample(301, 2);
        let y = aaft(&x, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(sorted(&x), sorted(&y));
    }

    #[test]
    fn rank_remap_orders_reference() {
        let out = rank_remap(&[1.0, 2.0, 3.0], &[0.5, -4.0, 9.0]);
        assert_eq!(out, vec![2.0, 1.0, 3.0]);
    }

    #[test]
    fn parseval() {
        for n in [64, 63] {
            let x = sample(n, 11);
            let spec = power_spectrum(&x, 0.5).unwrap();
            let mean_sq = x.iter().map(|v| v * v).sum::<f64>() / n as f64;
            assert_abs_diff_eq!(spec.power.iter().sum::<f64>(), mean_sq, epsilon = 1e-10);
            assert_eq!(spec.frequencies.len(), n / 2 + 1);
            assert_abs_diff_eq!(spec.frequencies[1], 1.0 / (n as f64 * 0.5), epsilon = 1e-15);
        }
    }

    #[test]
    fn rejects_bad_input() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(ft(&[], &mut rng).is_err());
        assert!(aaft(&[1.0, f64::NAN], &mut rng).is_err());
        assert_eq!(
            power_spectrum(&[1.0, 2.0], 0.0),
            Err(SurrogateError::InvalidSamplingInterval { dt: 0.0 })
        );
    }
}
