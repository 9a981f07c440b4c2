//! Autocorrelation via the Wiener–Khinchin theorem.

use chaoscope_stats::{RealFft, mean};
use num_complex::Complex;
use tracing::debug;

use crate::error::{DelayError, check_finite};

/// Rule for reading a delay off the autocorrelation function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DelayCriterion {
    /// First lag at which the autocorrelation is `<= 0`.
    #[default]
    FirstZero,
    /// First lag at which the autocorrelation drops below `1/e`.
    BelowInverseE,
}

/// Options for [`autocorrelation`].
#[derive(Debug, Clone, PartialEq)]
pub struct AcfConfig {
    /// Number of lags to return (including lag 0). `None` returns all `N`.
    max_lag: Option<usize>,
    /// Divide by the lag-0 value so that `r[0] = 1`.
    normalize: bool,
    /// Subtract the mean before correlating.
    detrend: bool,
}

impl AcfConfig {
    /// Defaults: all lags, normalized, mean removed.
    pub fn new() -> Self {
        Self {
            max_lag: None,
            normalize: true,
            detrend: true,
        }
    }

    /// Returns only the first `max_lag` lags.
    pub fn with_max_lag(mut self, max_lag: usize) -> Self {
        self.max_lag = Some(max_lag);
        self
    }

    /// Enables or disables normalization by the lag-0 value.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Enables or disables mean removal.
    pub fn with_detrend(mut self, detrend: bool) -> Self {
        self.detrend = detrend;
        self
    }

    /// Returns the lag limit, if any.
    pub fn max_lag(&self) -> Option<usize> {
        self.max_lag
    }

    /// Returns whether the output is normalized.
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Returns whether the mean is removed.
    pub fn detrend(&self) -> bool {
        self.detrend
    }
}

impl Default for AcfConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Autocorrelation `r[t] = Σ_i x_i x_{i+t}` for `t = 0..max_lag`.
///
/// Computed as the inverse transform of the power spectrum of `x`
/// zero-padded to `2N - 1`, which gives the linear (not circular)
/// correlation.
///
/// # Errors
///
/// [`DelayError::SeriesTooShort`] for empty input,
/// [`DelayError::InvalidMaxLag`] for a lag limit of zero,
/// [`DelayError::NonFiniteInput`], and [`DelayError::ZeroVariance`] when
/// normalization is requested for a series whose lag-0 value is zero.
pub fn autocorrelation(x: &[f64], config: &AcfConfig) -> Result<Vec<f64>, DelayError> {
    let n = x.len();
    if n == 0 {
        return Err(DelayError::SeriesTooShort { len: 0, required: 1 });
    }
    if config.max_lag == Some(0) {
        return Err(DelayError::InvalidMaxLag { max_lag: 0 });
    }
    check_finite(x)?;

    let offset = if config.detrend { mean(x) } else { 0.0 };
    let centered: Vec<f64> = x.iter().map(|&v| v - offset).collect();

    let mut fft = RealFft::new(2 * n - 1);
    let power: Vec<Complex<f64>> = fft
        .forward(&centered)
        .iter()
        .map(|c| Complex::new(c.norm_sqr(), 0.0))
        .collect();
    let mut r = fft.inverse(&power);
    r.truncate(config.max_lag.map_or(n, |m| m.min(n)));

    if config.normalize {
        let r0 = r[0];
        if r0 <= 0.0 {
            return Err(DelayError::ZeroVariance {
                statistic: "normalized autocorrelation",
            });
        }
        r.iter_mut().for_each(|v| *v /= r0);
    }
    Ok(r)
}

/// First lag satisfying `criterion` on a normalized autocorrelation, or
/// `None` if no lag below `max_lag` does.
pub fn acf_delay(
    x: &[f64],
    criterion: DelayCriterion,
    max_lag: Option<usize>,
) -> Result<Option<usize>, DelayError> {
    let mut config = AcfConfig::new();
    if let Some(m) = max_lag {
        config = config.with_max_lag(m);
    }
    let r = autocorrelation(x, &config)?;
    let threshold = match criterion {
        DelayCriterion::FirstZero => 0.0,
        DelayCriterion::BelowInverseE => (-1.0f64).exp(),
    };
    let delay = r.iter().skip(1).position(|&v| match criterion {
        DelayCriterion::FirstZero => v <= threshold,
        DelayCriterion::BelowInverseE => v < threshold,
    });
    let delay = delay.map(|p| p + 1);
    debug!(?criterion, ?delay, lags = r.len(), "autocorrelation delay");
    Ok(delay)
}
