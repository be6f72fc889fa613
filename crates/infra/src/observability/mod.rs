//! Logging setup
//!
//! Installs a global `tracing` subscriber from [`LoggingConfig`]:
//! - `RUST_LOG`, when set, overrides the configured level
//! - Plain human-readable lines, or one JSON object per line
//! - Safe to call more than once; later calls keep the first subscriber
//!
//! ```rust,no_run
//! use helpkit_domain::LoggingConfig;
//! use helpkit_infra::observability::init_logging;
//!
//! init_logging(&LoggingConfig { level: "helpkit_infra=debug,info".into(), json: false })?;
//! # Ok::<(), helpkit_domain::HelpkitError>(())
//! ```

use helpkit_domain::{HelpkitError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber
///
/// Returns `Ok(true)` when this call installed it, `Ok(false)` when a
/// subscriber was already in place.
///
/// # Errors
/// Returns `HelpkitError::Config` when the level or `RUST_LOG` is not a
/// valid filter directive.
pub fn init_logging(config: &LoggingConfig) -> Result<bool> {
    let filter = build_filter(&config.level, std::env::var("RUST_LOG").ok().as_deref())?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_current_span(false)).try_init().is_ok()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "logging initialized");
    }
    Ok(installed)
}

/// `RUST_LOG` wins over the configured level when it is non-empty
fn build_filter(level: &str, rust_log: Option<&str>) -> Result<EnvFilter> {
    let directives = match rust_log.map(str::trim).filter(|value| !value.is_empty()) {
        Some(from_env) => from_env,
        None => level.trim(),
    };
    EnvFilter::try_new(directives)
        .map_err(|e| HelpkitError::Config(format!("Invalid log filter '{directives}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_overrides_configured_level() {
        let filter = build_filter("info", Some("helpkit_infra=trace")).unwrap();
        assert_eq!(filter.to_string(), "helpkit_infra=trace");

        let filter = build_filter("warn", Some("  ")).unwrap();
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn invalid_directives_are_config_errors() {
        let err = build_filter("helpkit=loud", None).unwrap_err();
        assert!(matches!(err, HelpkitError::Config(msg) if msg.contains("helpkit=loud")));
    }

    #[test]
    fn init_is_idempotent() {
        let config = LoggingConfig::default();
        let first = init_logging(&config).unwrap();
        let second = init_logging(&config).unwrap();
        // another test may have installed a subscriber first
        assert!(!second);
        let _ = first;
    }
}
