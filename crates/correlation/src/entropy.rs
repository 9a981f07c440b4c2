//! Correlation entropy `K2` from the decay of `C(r)` with embedding
//! dimension.

use chaoscope_embed::{TimeSeries, embed};
use tracing::{debug, warn};

use crate::config::CorrelationConfig;
use crate::error::CorrelationError;
use crate::sum::{admissible_pairs, cumulative_counts};

/// `C(r, d)` at one embedding dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct EntropySample {
    /// Embedding dimension.
    pub dimension: usize,
    /// `C(r, d)`, or why it could not be computed. May be zero.
    pub outcome: Result<f64, CorrelationError>,
}

/// `C(r, d)` over consecutive embedding dimensions at a fixed radius.
#[derive(Debug, Clone, PartialEq)]
pub struct EntropyCurve {
    /// The fixed radius.
    pub radius: f64,
    /// The embedding delay.
    pub tau: usize,
    /// One sample per dimension, in the order requested.
    pub samples: Vec<EntropySample>,
}

impl EntropyCurve {
    /// `(d, K2(d))` with `K2(d) = (ln C(r, d) - ln C(r, d + 1)) / tau`,
    /// wherever both sums are available and positive.
    ///
    /// Units are per sample; divide by the sampling interval for per-time
    /// units.
    pub fn entropies(&self) -> Vec<(usize, f64)> {
        self.samples
            .windows(2)
            .filter_map(|w| {
                let lo = *w[0].outcome.as_ref().ok()?;
                let hi = *w[1].outcome.as_ref().ok()?;
                (w[1].dimension == w[0].dimension + 1 && lo > 0.0 && hi > 0.0)
                    .then(|| (w[0].dimension, (lo.ln() - hi.ln()) / self.tau as f64))
            })
            .collect()
    }
}

/// Correlation sums at radius `radius` for each embedding dimension, from
/// which the correlation entropy follows via [`EntropyCurve::entropies`].
///
/// The metric and Theiler window come from `config`; its radius
/// settings are ignored.
///
/// # Errors
///
/// An invalid radius or delay, or non-finite input, fail the whole call.
/// Failures at individual dimensions are recorded per sample.
#[tracing::instrument(skip(x, dims, config), fields(n = x.len()))]
pub fn correlation_entropy<I>(
    x: &[f64],
    dims: I,
    tau: usize,
    radius: f64,
    config: &CorrelationConfig,
) -> Result<EntropyCurve, CorrelationError>
where
    I: IntoIterator<Item = usize>,
{
    if tau == 0 {
        return Err(chaoscope_embed::EmbedError::InvalidDelay { tau }.into());
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(CorrelationError::InvalidRadius { radius });
    }
    TimeSeries::validate(x)?;

    let samples: Vec<EntropySample> = dims
        .into_iter()
        .map(|dimension| {
            let outcome = sum_at(x, dimension, tau, radius, config);
            if let Err(e) = &outcome {
                warn!(dimension, error = %e, "correlation sum failed");
            }
            EntropySample { dimension, outcome }
        })
        .collect();
    debug!(dimensions = samples.len(), "correlation entropy");
    Ok(EntropyCurve { radius, tau, samples })
}

fn sum_at(x: &[f64], dim: usize, tau: usize, radius: f64, config: &CorrelationConfig) -> Result<f64, CorrelationError> {
    let traj = embed(x, tau, dim)?;
    let total = admissible_pairs(traj.len(), config.window());
    if total == 0 {
        return Err(CorrelationError::NoPairs {
            len: traj.len(),
            window: config.window(),
        });
    }
    let counts = cumulative_counts(&traj, &[radius], config.metric(), config.window())?;
    Ok(counts[0] as f64 / total as f64)
}
