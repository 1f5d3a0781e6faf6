//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_LEVEL;

/// Build the filter: `RUST_LOG` wins, then the configured level.
pub fn env_filter(config_level: &str) -> EnvFilter {
    resolve_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), config_level)
}

/// First parseable of `rust_log`, `config_level`, then [`DEFAULT_LOG_LEVEL`].
fn resolve_filter(rust_log: Option<&str>, config_level: &str) -> EnvFilter {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_new(config_level).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// Install a stderr fmt subscriber. Safe to call once per process; later
/// calls are ignored.
pub fn init_logging(config_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_level_used_without_rust_log() {
        assert_eq!(resolve_filter(None, "debug").to_string(), "debug");
        assert_eq!(resolve_filter(Some("  "), "info").to_string(), "info");
    }

    #[test]
    fn test_rust_log_wins_over_config() {
        assert_eq!(resolve_filter(Some("trace"), "debug").to_string(), "trace");
    }

    #[test]
    fn test_unparseable_levels_fall_back() {
        assert_eq!(
            resolve_filter(Some("credvault=loud"), "info").to_string(),
            "info"
        );
        assert_eq!(
            resolve_filter(None, "credvault=loud").to_string(),
            DEFAULT_LOG_LEVEL
        );
    }
}
