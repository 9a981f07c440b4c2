use chaoscope_correlation::{CorrelationConfig, CorrelationError, DEFAULT_NUM_RADII};
use chaoscope_dimension::{AfnConfig, DimensionError, FnnConfig};
use chaoscope_embed::{EmbedError, ErrorKind};
use chaoscope_lyapunov::{LyapunovConfig, LyapunovError};
use chaoscope_neighbors::Metric;
use chaoscope_noise::{NoiseError, ProjectiveConfig};
use chaoscope_surrogates::{DEFAULT_MAX_ITER, IaaftConfig, SurrogateError, SurrogateMethod};
use serde::Deserialize;

/// Errors from loading or validating an [`AnalysisConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The TOML text is malformed or holds unknown keys.
    #[error("failed to parse configuration: {message}")]
    Parse {
        /// Parser diagnostic.
        message: String,
    },

    /// A value is out of range.
    #[error("{field} must be {requirement}, got {value}")]
    InvalidValue {
        /// Dotted key of the offending value.
        field: &'static str,
        /// What the value must satisfy.
        requirement: &'static str,
        /// The value as written.
        value: String,
    },

    /// Invalid delay or dimension.
    #[error(transparent)]
    Embed(#[from] EmbedError),

    /// Invalid false-neighbor settings.
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    /// Invalid correlation-sum settings.
    #[error(transparent)]
    Correlation(#[from] CorrelationError),

    /// Invalid divergence-tracking settings.
    #[error(transparent)]
    Lyapunov(#[from] LyapunovError),

    /// Invalid noise-reduction settings.
    #[error(transparent)]
    Noise(#[from] NoiseError),

    /// Invalid surrogate settings.
    #[error(transparent)]
    Surrogate(#[from] SurrogateError),
}

impl ConfigError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::Parse { .. } | ConfigError::InvalidValue { .. } => ErrorKind::InvalidParameter,
            ConfigError::Embed(e) => e.kind(),
            ConfigError::Dimension(e) => e.kind(),
            ConfigError::Correlation(e) => e.kind(),
            ConfigError::Lyapunov(e) => e.kind(),
            ConfigError::Noise(e) => e.kind(),
            ConfigError::Surrogate(e) => e.kind(),
        }
    }
}

/// Top-level analysis configuration.
///
/// Every key is optional; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Base seed for randomized steps (shuffled baselines, surrogates).
    #[serde(default)]
    pub seed: Option<u64>,

    /// Embedding delay τ in samples.
    #[serde(default = "default_delay")]
    pub delay: usize,

    /// Embedding dimension d.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Theiler window w in samples.
    #[serde(default = "default_theiler_window")]
    pub theiler_window: usize,

    /// Distance metric shared by every estimator.
    #[serde(default)]
    pub metric: Metric,

    /// False nearest neighbors.
    #[serde(default)]
    pub fnn: FnnToml,

    /// Correlation sum.
    #[serde(default)]
    pub correlation: CorrelationToml,

    /// Divergence tracking.
    #[serde(default)]
    pub lyapunov: LyapunovToml,

    /// Surrogate ensembles.
    #[serde(default)]
    pub surrogates: SurrogatesToml,

    /// Local projective noise reduction.
    #[serde(default)]
    pub noise: NoiseToml,
}

fn default_delay() -> usize {
    1
}
fn default_dimension() -> usize {
    3
}
fn default_theiler_window() -> usize {
    10
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FnnToml {
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    #[serde(default = "default_atol")]
    pub atol: f64,
    #[serde(default = "default_max_dimension")]
    pub max_dimension: usize,
}

impl Default for FnnToml {
    fn default() -> Self {
        Self {
            rtol: default_rtol(),
            atol: default_atol(),
            max_dimension: default_max_dimension(),
        }
    }
}

fn default_rtol() -> f64 {
    10.0
}
fn default_atol() -> f64 {
    2.0
}
fn default_max_dimension() -> usize {
    10
}

/// Radius bounds of zero mean "derive from the trajectory extent".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorrelationToml {
    #[serde(default)]
    pub r_min: Option<f64>,
    #[serde(default)]
    pub r_max: Option<f64>,
    #[serde(default = "default_num_r")]
    pub num_r: usize,
}

impl Default for CorrelationToml {
    fn default() -> Self {
        Self {
            r_min: None,
            r_max: None,
            num_r: default_num_r(),
        }
    }
}

fn default_num_r() -> usize {
    DEFAULT_NUM_RADII
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LyapunovToml {
    #[serde(default = "default_horizon")]
    pub horizon: usize,
}

impl Default for LyapunovToml {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
        }
    }
}

fn default_horizon() -> usize {
    500
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurrogatesToml {
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub method: SurrogateMethod,
    #[serde(default = "default_iaaft_max_iter")]
    pub iaaft_max_iter: usize,
}

impl Default for SurrogatesToml {
    fn default() -> Self {
        Self {
            count: default_count(),
            method: SurrogateMethod::default(),
            iaaft_max_iter: default_iaaft_max_iter(),
        }
    }
}

fn default_count() -> usize {
    19
}
fn default_iaaft_max_iter() -> usize {
    DEFAULT_MAX_ITER
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoiseToml {
    #[serde(default = "default_passes")]
    pub passes: usize,
    #[serde(default = "default_neighborhood_size")]
    pub neighborhood_size: usize,
    #[serde(default = "default_signal_dimension")]
    pub signal_dimension: usize,
}

impl Default for NoiseToml {
    fn default() -> Self {
        Self {
            passes: default_passes(),
            neighborhood_size: default_neighborhood_size(),
            signal_dimension: default_signal_dimension(),
        }
    }
}

fn default_passes() -> usize {
    1
}
fn default_neighborhood_size() -> usize {
    20
}
fn default_signal_dimension() -> usize {
    2
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            seed: None,
            delay: default_delay(),
            dimension: default_dimension(),
            theiler_window: default_theiler_window(),
            metric: Metric::default(),
            fnn: FnnToml::default(),
            correlation: CorrelationToml::default(),
            lyapunov: LyapunovToml::default(),
            surrogates: SurrogatesToml::default(),
            noise: NoiseToml::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section against the estimator it configures.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delay == 0 {
            return Err(EmbedError::InvalidDelay { tau: 0 }.into());
        }
        if self.dimension == 0 {
            return Err(EmbedError::InvalidDimension { dim: 0 }.into());
        }
        if self.fnn.max_dimension == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fnn.max_dimension",
                requirement: ">= 1",
                value: "0".to_string(),
            });
        }
        for (field, value) in [
            ("correlation.r_min", self.correlation.r_min),
            ("correlation.r_max", self.correlation.r_max),
        ] {
            if let Some(r) = value
                && !(r.is_finite() && r >= 0.0)
            {
                return Err(ConfigError::InvalidValue {
                    field,
                    requirement: "finite and non-negative",
                    value: r.to_string(),
                });
            }
        }
        if self.surrogates.count == 0 {
            return Err(SurrogateError::InvalidCount { count: 0 }.into());
        }
        self.to_fnn_config().validate()?;
        self.to_afn_config().validate()?;
        self.to_correlation_config().validate()?;
        self.to_lyapunov_config().validate()?;
        self.to_projective_config().validate()?;
        self.to_iaaft_config().validate()?;
        Ok(())
    }

    /// False-nearest-neighbor settings.
    pub fn to_fnn_config(&self) -> FnnConfig {
        FnnConfig::new(self.delay)
            .with_rtol(self.fnn.rtol)
            .with_atol(self.fnn.atol)
            .with_window(self.theiler_window)
            .with_metric(self.metric)
    }

    /// Averaged-false-neighbor settings.
    pub fn to_afn_config(&self) -> AfnConfig {
        AfnConfig::new(self.delay)
            .with_window(self.theiler_window)
            .with_metric(self.metric)
    }

    /// Correlation-sum settings. A bound of zero is derived from the
    /// trajectory extent.
    pub fn to_correlation_config(&self) -> CorrelationConfig {
        let bound = |r: Option<f64>| r.filter(|&r| r != 0.0);
        CorrelationConfig::new()
            .with_metric(self.metric)
            .with_window(self.theiler_window)
            .with_num_radii(self.correlation.num_r)
            .with_radius_bounds(bound(self.correlation.r_min), bound(self.correlation.r_max))
    }

    /// Divergence-tracking settings.
    pub fn to_lyapunov_config(&self) -> LyapunovConfig {
        LyapunovConfig::new(self.lyapunov.horizon)
            .with_window(self.theiler_window)
            .with_metric(self.metric)
    }

    /// Local projective noise-reduction settings.
    pub fn to_projective_config(&self) -> ProjectiveConfig {
        ProjectiveConfig::new(self.dimension)
            .with_tau(self.delay)
            .with_neighbors(self.noise.neighborhood_size)
            .with_signal_dimension(self.noise.signal_dimension)
            .with_passes(self.noise.passes)
            .with_window(self.theiler_window)
            .with_metric(self.metric)
    }

    /// IAAFT settings.
    pub fn to_iaaft_config(&self) -> IaaftConfig {
        IaaftConfig::new().with_max_iter(self.surrogates.iaaft_max_iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaoscope_correlation::Radii;

    const FULL: &str = r#"
seed = 42
delay = 4
dimension = 5
theiler_window = 25
metric = "cityblock"

[fnn]
rtol = 15.0
atol = 2.5
max_dimension = 8

[correlation]
r_min = 0.0
r_max = 2.0
num_r = 50

[lyapunov]
horizon = 300

[surrogates]
count = 39
method = "aaft"
iaaft_max_iter = 200

[noise]
passes = 3
neighborhood_size = 30
signal_dimension = 3
"#;

    #[test]
    fn parses_every_section() {
        let config = AnalysisConfig::from_toml_str(FULL).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.delay, 4);
        assert_eq!(config.metric, Metric::Manhattan);
        assert_eq!(config.fnn.max_dimension, 8);
        assert_eq!(config.surrogates.method, SurrogateMethod::Aaft);
        assert_eq!(config.surrogates.count, 39);

        assert_eq!(config.to_fnn_config().window(), 25);
        let afn = config.to_afn_config();
        assert_eq!((afn.tau(), afn.window(), afn.metric()), (4, 25, Metric::Manhattan));
        assert!(afn.validate().is_ok());
        assert_eq!(config.to_lyapunov_config().horizon(), 300);
        assert_eq!(config.to_iaaft_config().max_iter(), 200);
        let noise = config.to_projective_config();
        assert_eq!((noise.dim(), noise.tau(), noise.neighbors()), (5, 4, 30));
        assert_eq!(noise.signal_dimension(), 3);
        assert_eq!(
            config.to_correlation_config().radii(),
            &Radii::Geometric {
                r_min: None,
                r_max: Some(2.0),
                num: 50
            }
        );
    }

    #[test]
    fn empty_document_gives_defaults() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.metric, Metric::Chebyshev);
        assert_eq!(config.surrogates.method, SurrogateMethod::Iaaft);
        assert_eq!(config.lyapunov.horizon, 500);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AnalysisConfig::from_toml_str("dimesion = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert!(AnalysisConfig::from_toml_str("[noise]\nradius = 1.0").is_err());
        assert!(AnalysisConfig::from_toml_str("metric = \"hamming\"").is_err());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let cases = [
            "delay = 0",
            "[correlation]\nr_min = 2.0\nr_max = 1.0",
            "[correlation]\nr_max = -1.0",
            "[correlation]\nnum_r = 1",
            "[surrogates]\ncount = 0",
            "[surrogates]\niaaft_max_iter = 0",
            "[lyapunov]\nhorizon = 0",
            "[fnn]\nmax_dimension = 0",
            "dimension = 2\n[noise]\nsignal_dimension = 2",
        ];
        for text in cases {
            let err = AnalysisConfig::from_toml_str(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter, "{text}: {err}");
        }
    }

    #[test]
    fn range_error_message() {
        let err = AnalysisConfig::from_toml_str("[correlation]\nr_min = 2.0\nr_max = 1.0").unwrap_err();
        assert_eq!(err.to_string(), "radius range requires 0 < r_min < r_max, got [2, 1]");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<ConfigError>();
    }
}
