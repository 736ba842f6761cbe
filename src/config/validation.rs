//! Configuration validation.
//!
//! This module provides validation logic for configuration values,
//! ensuring they are within acceptable ranges.

use super::Config;
use crate::error::ConfigError;

/// Minimum allowed timeout in milliseconds (1 second).
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Maximum allowed timeout in milliseconds (5 minutes).
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if any value is out of range:
/// - `PYCTURE_API_KEY` must not be empty
/// - `REQUEST_TIMEOUT_MS` must be between 1000 and 300000
/// - Base URLs must not be empty
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // API key must not be empty
    if config.api_key.is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "PYCTURE_API_KEY".into(),
            reason: "must not be empty".into(),
        });
    }

    // Timeout must be reasonable (1s to 5m)
    if config.request_timeout_ms < MIN_TIMEOUT_MS || config.request_timeout_ms > MAX_TIMEOUT_MS {
        return Err(ConfigError::InvalidValue {
            var: "REQUEST_TIMEOUT_MS".into(),
            reason: format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms"),
        });
    }

    // Overridable base URLs must still point somewhere
    if config.anthropic_base_url.is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "ANTHROPIC_BASE_URL".into(),
            reason: "must not be empty".into(),
        });
    }
    if config.openai_base_url.is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "OPENAI_BASE_URL".into(),
            reason: "must not be empty".into(),
        });
    }

    Ok(())
}
