//! Validated, immutable time series of scalar or fixed-width vector samples.

use crate::error::EmbedError;
use crate::trajectory::{EmbeddedTrajectory, embed_rows};

/// A uniformly sampled series of `len()` samples, each `width()` values wide.
///
/// Samples are stored row-major: sample `t` occupies
/// `data[t * width..(t + 1) * width]`. All values are finite.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    data: Vec<f64>,
    width: usize,
}

impl TimeSeries {
    /// Creates a scalar series.
    ///
    /// # Errors
    ///
    /// [`EmbedError::EmptySeries`] for empty input and
    /// [`EmbedError::NonFiniteInput`] if any value is NaN or infinite.
    pub fn new(data: Vec<f64>) -> Result<Self, EmbedError> {
        Self::from_rows(data, 1)
    }

    /// Creates a vector series from a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// In addition to the checks of [`TimeSeries::new`],
    /// [`EmbedError::ShapeMismatch`] when `width == 0` or the buffer length
    /// is not a multiple of `width`.
    pub fn from_rows(data: Vec<f64>, width: usize) -> Result<Self, EmbedError> {
        if width == 0 || data.len() % width != 0 {
            return Err(EmbedError::ShapeMismatch {
                len: data.len(),
                width,
            });
        }
        if data.is_empty() {
            return Err(EmbedError::EmptySeries);
        }
        check_finite(&data)?;
        Ok(Self { data, width })
    }

    /// Checks a borrowed scalar buffer against the rules of
    /// [`TimeSeries::new`] without taking a copy.
    ///
    /// # Errors
    ///
    /// The same as [`TimeSeries::new`].
    pub fn validate(data: &[f64]) -> Result<(), EmbedError> {
        if data.is_empty() {
            return Err(EmbedError::EmptySeries);
        }
        check_finite(data)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.data.len() / self.width
    }

    /// Always `false`: construction rejects empty series.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Values per sample (1 for a scalar series).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns `true` for a scalar series.
    pub fn is_scalar(&self) -> bool {
        self.width == 1
    }

    /// The flat row-major sample buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Sample `t` (a slice of `width()` values).
    ///
    /// # Panics
    ///
    /// Panics if `t >= len()`.
    pub fn sample(&self, t: usize) -> &[f64] {
        &self.data[t * self.width..(t + 1) * self.width]
    }

    /// Copies channel `c` out as a scalar sequence.
    ///
    /// # Panics
    ///
    /// Panics if `c >= width()`.
    pub fn channel(&self, c: usize) -> Vec<f64> {
        assert!(c < self.width, "channel {c} out of range for width {}", self.width);
        self.data.iter().skip(c).step_by(self.width).copied().collect()
    }

    /// Delay-embeds the series.
    ///
    /// For a vector series each delay vector is the concatenation of the
    /// delayed samples, so points have `width() * dim` coordinates ordered
    /// `[x_t, x_{t+tau}, ..., x_{t+(dim-1)tau}]` with every `x` a full sample.
    pub fn embed(&self, tau: usize, dim: usize) -> Result<EmbeddedTrajectory, EmbedError> {
        embed_rows(&self.data, self.width, tau, dim)
    }
}

impl TryFrom<Vec<f64>> for TimeSeries {
    type Error = EmbedError;

    fn try_from(data: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

pub(crate) fn check_finite(data: &[f64]) -> Result<(), EmbedError> {
    match data.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(EmbedError::NonFiniteInput { index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_series() {
        let ts = TimeSeries::new(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ts.len(), 3);
        assert_eq!(ts.width(), 1);
        assert!(ts.is_scalar());
        assert_eq!(ts.sample(1), &[2.0]);
    }

    #[test]
    fn vector_series_channels() {
        let ts = TimeSeries::from_rows(vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0], 2).unwrap();
        assert_eq!(ts.len(), 3);
        assert_eq!(ts.sample(2), &[3.0, 30.0]);
        assert_eq!(ts.channel(1), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(TimeSeries::new(vec![]), Err(EmbedError::EmptySeries));
        assert_eq!(
            TimeSeries::new(vec![1.0, f64::NAN]),
            Err(EmbedError::NonFiniteInput { index: 1 })
        );
        assert_eq!(
            TimeSeries::from_rows(vec![1.0, 2.0, 3.0], 2),
            Err(EmbedError::ShapeMismatch { len: 3, width: 2 })
        );
        assert!(matches!(
            TimeSeries::from_rows(vec![1.0], 0),
            Err(EmbedError::ShapeMismatch { width: 0, .. })
        ));
    }

    #[test]
    fn borrowed_validation_matches_construction() {
        assert_eq!(TimeSeries::validate(&[0.0, 1.5]), Ok(()));
        assert_eq!(TimeSeries::validate(&[]), Err(EmbedError::EmptySeries));
        assert_eq!(
            TimeSeries::validate(&[1.0, 2.0, f64::INFINITY]),
            Err(EmbedError::NonFiniteInput { index: 2 })
        );
    }

    #[test]
    fn try_from_vec() {
        let ts: TimeSeries = vec![0.5, 0.25].try_into().unwrap();
        assert_eq!(ts.as_slice(), &[0.5, 0.25]);
    }
}
