//! Tracing subscriber setup
//!
//! `RUST_LOG` overrides the configured level when set. The JSON format
//! includes the current span's fields on every line, so a `correlation_id`
//! recorded on a request span appears on each event logged inside it.

use byte_domain::{DomainError, LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter from `RUST_LOG`, falling back to the configured level.
///
/// # Errors
/// Returns `DomainError::Config` when the configured directive is invalid.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, DomainError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| DomainError::Config(format!("Invalid log level '{}': {e}", config.level))),
    }
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` without changing anything when a global subscriber is
/// already installed.
///
/// # Errors
/// Returns `DomainError::Config` when the configured directive is invalid.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool, DomainError> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).with_span_list(false))
            .try_init()
            .is_ok(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init().is_ok(),
    };

    Ok(installed)
}
