//! Per-delay result records.

use crate::error::DelayError;
use crate::mi::first_minimum;

/// Statistic evaluated at one candidate delay.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayPoint {
    /// Candidate delay.
    pub delay: usize,
    /// The statistic, or why it could not be computed at this delay.
    pub value: Result<f64, DelayError>,
}

/// A statistic evaluated over a range of candidate delays.
///
/// Failures at individual delays are kept in place so the rest of the curve
/// remains usable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DelayCurve {
    /// One entry per candidate delay, in the order evaluated.
    pub points: Vec<DelayPoint>,
}

impl DelayCurve {
    /// `(delay, value)` for every delay where the statistic was computed.
    pub fn values(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.value.as_ref().ok().map(|&v| (p.delay, v)))
    }

    /// Number of delays that failed.
    pub fn failures(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_err()).count()
    }

    /// Delay with the smallest value.
    pub fn argmin(&self) -> Option<usize> {
        self.values()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(delay, _)| delay)
    }

    /// Advisory delay: the first local minimum of the successfully computed
    /// values, else the global minimum.
    pub fn preferred_delay(&self) -> Option<usize> {
        let (delays, values): (Vec<usize>, Vec<f64>) = self.values().unzip();
        first_minimum(&values)
            .map(|p| delays[p])
            .or_else(|| self.argmin())
    }
}
