//! End-point mismatch.
//!
//! Fourier surrogates treat the series as periodic, so a jump between the
//! last and first samples leaks into every frequency. Choosing a segment
//! whose ends match in value and slope reduces that artifact.

use chaoscope_embed::TimeSeries;
use chaoscope_stats::min_max;

use crate::error::SurrogateError;

/// Segment lengths with fast FFTs: powers of these primes.
const FFT_FRIENDLY_PRIMES: [usize; 5] = [2, 3, 5, 7, 11];

/// The best-matched segment found by [`mismatch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    /// First index of the segment.
    pub start: usize,
    /// One past the last index of the segment.
    pub end: usize,
    /// Weighted end-point discontinuity of the segment.
    pub discontinuity: f64,
}

/// Parameters for [`mismatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct MismatchConfig {
    length: Option<usize>,
    weight: f64,
    neigh: usize,
}

impl MismatchConfig {
    /// Default configuration: automatic length, weight 0.5, 3 end points.
    pub fn new() -> Self {
        Self {
            length: None,
            weight: 0.5,
            neigh: 3,
        }
    }

    /// Fixes the segment length.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the weight of the slope term (the value term gets `1 - weight`).
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the number of samples compared at each end.
    pub fn with_neighborhood(mut self, neigh: usize) -> Self {
        self.neigh = neigh;
        self
    }

    /// Returns the fixed segment length, if any.
    pub fn length(&self) -> Option<usize> {
        self.length
    }

    /// Returns the slope weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the end-point neighborhood size.
    pub fn neighborhood(&self) -> usize {
        self.neigh
    }
}

impl Default for MismatchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest `p^k <= n` over the FFT-friendly primes.
pub fn fft_friendly_length(n: usize) -> usize {
    FFT_FRIENDLY_PRIMES
        .iter()
        .map(|&p| {
            let mut power = 1usize;
            while let Some(next) = power.checked_mul(p)
                && next <= n
            {
                power = next;
            }
            power
        })
        .max()
        .unwrap_or(1)
}

fn rescaled(x: &[f64], what: &'static str) -> Result<Vec<f64>, SurrogateError> {
    let (lo, hi) = min_max(x).ok_or(SurrogateError::ZeroVariance { what })?;
    if lo == hi {
        return Err(SurrogateError::ZeroVariance { what });
    }
    Ok(x.iter().map(|v| (v - lo) / (hi - lo)).collect())
}

/// Finds the segment of `x` with the smallest end-point discontinuity.
///
/// Values and first differences are each rescaled to `[0, 1]`; for a
/// candidate start `i` the discontinuity is the weighted mean squared
/// difference of `neigh` values (and differences) at the start against
/// the `neigh` following the segment end. The first sample is dropped so
/// values and differences align; returned indices refer to `x`.
///
/// # Errors
///
/// Invalid input, a weight outside `[0, 1]`, a segment that does not fit,
/// and a constant series or constant slope.
#[tracing::instrument(skip(x, config), fields(n = x.len()))]
pub fn mismatch(x: &[f64], config: &MismatchConfig) -> Result<Mismatch, SurrogateError> {
    TimeSeries::validate(x)?;
    if !(0.0..=1.0).contains(&config.weight) {
        return Err(SurrogateError::InvalidWeight { weight: config.weight });
    }
    let diffs: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let dx = rescaled(&diffs, "first difference")?;
    let values = rescaled(x, "series")?;
    let values = &values[1..];

    let n = values.len();
    let neigh = config.neigh.max(1);
    let length = config.length.unwrap_or_else(|| fft_friendly_length(n));
    let candidates = n.checked_sub(length + neigh).filter(|&c| c > 0 && length > 0).ok_or(
        SurrogateError::InvalidSegment {
            length,
            neigh,
            len: n,
        },
    )?;

    let w = config.weight;
    let mut best = Mismatch {
        start: 1,
        end: 1 + length,
        discontinuity: f64::INFINITY,
    };
    for i in 0..candidates {
        let value_term = mean_sq_diff(&values[i..i + neigh], &values[i + length..i + length + neigh]);
        let slope_term = mean_sq_diff(&dx[i..i + neigh], &dx[i + length..i + length + neigh]);
        let d = (1.0 - w) * value_term + w * slope_term;
        if d < best.discontinuity {
            best = Mismatch {
                start: i + 1,
                end: i + 1 + length,
                discontinuity: d,
            };
        }
    }
    Ok(best)
}

fn mean_sq_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(u, v)| (u - v) * (u - v)).sum::<f64>() / a.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_lengths() {
        assert_eq!(fft_friendly_length(999), 729);
        assert_eq!(fft_friendly_length(1024), 1024);
        assert_eq!(fft_friendly_length(130), 128);
        assert_eq!(fft_friendly_length(125), 125);
        assert_eq!(fft_friendly_length(1), 1);
    }

    #[test]
    fn sine_period_is_found() {
        // Period 50: a segment of two full periods closes smoothly.
        let x: Vec<f64> = (0..400).map(|i| (2.0 * std::f64::consts::PI * i as f64 / 50.0).sin()).collect();
        let m = mismatch(&x, &MismatchConfig::new().with_length(100)).unwrap();
        assert_eq!(m.end - m.start, 100);
        assert!(m.discontinuity < 1e-20, "discontinuity {}", m.discontinuity);
    }

    #[test]
    fn invalid_parameters() {
        let x: Vec<f64> = (0..20).map(|i| (i as f64).sin()).collect();
        assert_eq!(
            mismatch(&x, &MismatchConfig::new().with_weight(1.5)),
            Err(SurrogateError::InvalidWeight { weight: 1.5 })
        );
        assert_eq!(
            mismatch(&x, &MismatchConfig::new().with_length(17)),
            Err(SurrogateError::InvalidSegment { length: 17, neigh: 3, len: 19 })
        );
        let ramp: Vec<f64> = (0..20).map(|i| i as f64).collect();
        assert_eq!(
            mismatch(&ramp, &MismatchConfig::new()),
            Err(SurrogateError::ZeroVariance { what: "first difference" })
        );
    }
}
