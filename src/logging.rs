use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &[
    "chaoscope",
    "chaoscope_correlation",
    "chaoscope_delay",
    "chaoscope_dimension",
    "chaoscope_embed",
    "chaoscope_lyapunov",
    "chaoscope_neighbors",
    "chaoscope_noise",
    "chaoscope_stats",
    "chaoscope_surrogates",
];

/// Filter directives for a verbosity level.
///
/// Mapping:
/// - 0 -> warn
/// - 1 -> info
/// - 2 -> debug
/// - 3+ -> trace
pub fn default_directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize tracing for the given verbosity level.
///
/// `RUST_LOG` overrides the level if set. Does nothing if a global
/// subscriber is already installed.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert!(default_directives(0).starts_with("chaoscope=warn,"));
        assert!(default_directives(2).contains("chaoscope_surrogates=debug"));
        assert!(default_directives(7).ends_with("chaoscope_surrogates=trace"));
        assert_eq!(default_directives(1).split(',').count(), CRATE_TARGETS.len());
    }

    #[test]
    fn init_twice_is_harmless() {
        init(0);
        init(3);
    }
}
