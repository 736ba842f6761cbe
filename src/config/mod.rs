//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading
//! - Configuration validation
//! - Default value handling
//! - Secure API key storage via [`SecretString`]
//!
//! # Example
//!
//! ```
//! use pycture::config::{Config, SecretString};
//! use pycture::provider::{Provider, DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_OPENAI_BASE_URL};
//!
//! // Create a config directly (use Config::from_env() in production)
//! let config = Config {
//!     api_key: SecretString::new("sk-ant-example-key"),
//!     provider: Provider::Anthropic,
//!     log_level: "info".to_string(),
//!     request_timeout_ms: 60_000,
//!     anthropic_model: Provider::Anthropic.default_model().to_string(),
//!     openai_model: Provider::OpenAi.default_model().to_string(),
//!     anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
//!     openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
//! };
//!
//! println!("Using provider: {}", config.provider);
//! // API key is protected from accidental logging
//! let debug = format!("{:?}", config);
//! assert!(debug.contains("<REDACTED>"));
//! assert!(!debug.contains("sk-ant-example-key"));
//! ```

mod secret;
mod validation;

pub use secret::SecretString;
pub use validation::{validate_config, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};

use crate::error::ConfigError;
use crate::provider::{
    Provider, DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_OPENAI_BASE_URL, DEFAULT_TIMEOUT_MS,
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default provider when `PYCTURE_PROVIDER` is not set.
pub const DEFAULT_PROVIDER: Provider = Provider::Anthropic;

/// Application configuration.
///
/// This struct holds all configuration values for the script generator.
/// Use [`Config::from_env`] to load configuration from environment variables.
///
/// The `api_key` field uses [`SecretString`] to prevent accidental logging.
/// Base URLs are overridable so tests and self-hosted gateways can point the
/// client at a different host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Provider API key (protected from logging via [`SecretString`]).
    pub api_key: SecretString,
    /// Provider to send generation requests to.
    pub provider: Provider,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Model identifier used for Anthropic requests.
    pub anthropic_model: String,
    /// Model identifier used for OpenAI requests.
    pub openai_model: String,
    /// Base URL for the Anthropic API.
    pub anthropic_base_url: String,
    /// Base URL for the OpenAI API.
    pub openai_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `PYCTURE_API_KEY`: provider API key
    ///
    /// Optional environment variables (with defaults):
    /// - `PYCTURE_PROVIDER`: `anthropic` or `openai` (default: `anthropic`)
    /// - `LOG_LEVEL`: Logging level (default: `info`)
    /// - `REQUEST_TIMEOUT_MS`: Request timeout (default: `60000`)
    /// - `ANTHROPIC_MODEL`: Model for Anthropic requests (default: `claude-sonnet-4-20250514`)
    /// - `OPENAI_MODEL`: Model for OpenAI requests (default: `gpt-4`)
    /// - `ANTHROPIC_BASE_URL`: Anthropic API base URL
    /// - `OPENAI_BASE_URL`: OpenAI API base URL
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `PYCTURE_API_KEY` is missing
    /// - `PYCTURE_PROVIDER` is not a known provider
    /// - `REQUEST_TIMEOUT_MS` is not a valid positive integer
    /// - Any value fails validation (see [`validate_config`])
    #[must_use = "configuration should be used"]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let api_key =
            std::env::var("PYCTURE_API_KEY").map_err(|_| ConfigError::MissingRequired {
                var: "PYCTURE_API_KEY".into(),
            })?;

        let provider = match std::env::var("PYCTURE_PROVIDER") {
            Ok(raw) => raw
                .parse::<Provider>()
                .map_err(|e| ConfigError::InvalidValue {
                    var: "PYCTURE_PROVIDER".into(),
                    reason: e.to_string(),
                })?,
            Err(_) => DEFAULT_PROVIDER,
        };

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());

        let request_timeout_ms = parse_env_u64("REQUEST_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;

        let anthropic_model = std::env::var("ANTHROPIC_MODEL")
            .unwrap_or_else(|_| Provider::Anthropic.default_model().into());
        let openai_model = std::env::var("OPENAI_MODEL")
            .unwrap_or_else(|_| Provider::OpenAi.default_model().into());

        let anthropic_base_url = std::env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_ANTHROPIC_BASE_URL.into());
        let openai_base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.into());

        let config = Self {
            api_key: SecretString::new(api_key),
            provider,
            log_level,
            request_timeout_ms,
            anthropic_model,
            openai_model,
            anthropic_base_url,
            openai_base_url,
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// The configured model for the given provider.
    #[must_use]
    pub fn model_for(&self, provider: Provider) -> &str {
        match provider {
            Provider::Anthropic => &self.anthropic_model,
            Provider::OpenAi => &self.openai_model,
        }
    }

    /// The configured base URL for the given provider.
    #[must_use]
    pub fn base_url_for(&self, provider: Provider) -> &str {
        match provider {
            Provider::Anthropic => &self.anthropic_base_url,
            Provider::OpenAi => &self.openai_base_url,
        }
    }
}

/// Parse an environment variable as u64, using a default if not set.
fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}
