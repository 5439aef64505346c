//! Configuration loading and management
//!
//! This module provides utilities for loading application configuration
//! from environment variables and files.

pub mod loader;

use byte_common::{Jitter, RetryPolicyConfig};
use byte_domain::{ClientSettings, DomainError, Result};

// Re-export commonly used items
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};

/// Convert client settings into a validated retry policy.
///
/// # Errors
/// Returns `DomainError::Config` for a zero attempt timeout, an unknown
/// jitter mode, or when the attempt/delay invariants do not hold.
pub fn retry_policy(settings: &ClientSettings) -> Result<RetryPolicyConfig> {
    if settings.timeout_secs == 0 {
        return Err(DomainError::Config("timeout_secs must be greater than zero".into()));
    }

    let jitter: Jitter =
        settings.jitter.parse().map_err(|e| DomainError::Config(format!("{e}")))?;

    RetryPolicyConfig::builder()
        .max_attempts(settings.max_attempts)
        .base_delay(settings.base_delay())
        .max_delay(settings.max_delay())
        .jitter(jitter)
        .build()
        .map_err(|e| DomainError::Config(e.to_string()))
}
