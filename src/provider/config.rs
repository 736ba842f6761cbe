//! Provider client configuration.
//!
//! This module provides per-provider endpoint, model, and timeout
//! settings with defaults, overridable for tests and proxies.

use super::Provider;

/// Default base URL for the Anthropic API.
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
/// Default base URL for the OpenAI API.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;
/// Token budget sent with every completion request.
pub const MAX_COMPLETION_TOKENS: u32 = 8192;

/// Client configuration for a provider API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL for the API.
    pub base_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl ClientConfig {
    /// Create a configuration with the defaults for the given provider.
    #[must_use]
    pub fn for_provider(provider: Provider) -> Self {
        let base_url = match provider {
            Provider::Anthropic => DEFAULT_ANTHROPIC_BASE_URL,
            Provider::OpenAi => DEFAULT_OPENAI_BASE_URL,
        };
        Self {
            base_url: base_url.to_string(),
            model: provider.default_model().to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Set base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_provider(Provider::Anthropic)
    }
}
