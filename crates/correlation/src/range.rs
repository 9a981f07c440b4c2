//! Geometrically spaced radii.

use crate::error::CorrelationError;

/// `num` values from `start` to `end` (both inclusive) with a constant
/// ratio between neighbors.
///
/// The range is a plain value: every call to [`iter`](Self::iter) starts
/// over from `start`.
///
/// ```
/// use chaoscope_correlation::GeometricRange;
///
/// let range = GeometricRange::new(1.0, 1000.0, 4).unwrap();
/// let values: Vec<f64> = range.iter().collect();
/// assert_eq!(values.len(), 4);
/// assert_eq!(values[0], 1.0);
/// assert_eq!(values[3], 1000.0);
/// assert!((values[1] - 10.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricRange {
    start: f64,
    end: f64,
    num: usize,
}

impl GeometricRange {
    /// Creates a range of `num >= 2` values with `0 < start < end`.
    pub fn new(start: f64, end: f64, num: usize) -> Result<Self, CorrelationError> {
        if num < 2 {
            return Err(CorrelationError::InvalidRadiusCount { num });
        }
        if !(start.is_finite() && end.is_finite() && start > 0.0 && start < end) {
            return Err(CorrelationError::InvalidRadiusRange { r_min: start, r_max: end });
        }
        Ok(Self { start, end, num })
    }

    /// First value.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Last value.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.num
    }

    /// Always `false`; a range holds at least two values.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Ratio between consecutive values.
    pub fn ratio(&self) -> f64 {
        (self.end / self.start).powf(1.0 / (self.num - 1) as f64)
    }

    /// Iterates over the values from the start.
    pub fn iter(&self) -> GeometricIter {
        GeometricIter {
            range: *self,
            front: 0,
            back: self.num,
        }
    }

    /// Collects the values.
    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    fn value(&self, k: usize) -> f64 {
        // The end points are exact so that `end` can be compared against
        // distances without rounding slop.
        if k == 0 {
            self.start
        } else if k + 1 == self.num {
            self.end
        } else {
            let t = k as f64 / (self.num - 1) as f64;
            self.start * (self.end / self.start).powf(t)
        }
    }
}

impl IntoIterator for GeometricRange {
    type Item = f64;
    type IntoIter = GeometricIter;

    fn into_iter(self) -> GeometricIter {
        self.iter()
    }
}

impl IntoIterator for &GeometricRange {
    type Item = f64;
    type IntoIter = GeometricIter;

    fn into_iter(self) -> GeometricIter {
        self.iter()
    }
}

/// Iterator over a [`GeometricRange`].
#[derive(Debug, Clone)]
pub struct GeometricIter {
    range: GeometricRange,
    front: usize,
    back: usize,
}

impl Iterator for GeometricIter {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.front >= self.back {
            return None;
        }
        let v = self.range.value(self.front);
        self.front += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for GeometricIter {
    fn next_back(&mut self) -> Option<f64> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.range.value(self.back))
    }
}

impl ExactSizeIterator for GeometricIter {}
