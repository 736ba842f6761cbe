//! LLM provider integration.
//!
//! This module handles the outbound side of the pipeline:
//! - [`Provider`]: which external completion service a request targets
//! - [`ClientConfig`]: per-provider endpoint, model, and timeout settings
//! - [`ProviderClient`]: the HTTP client that performs the single
//!   request/response exchange
//! - wire types and response normalization ([`types`])
//!
//! The two providers accept the same request shape but answer with
//! different JSON; [`types::ProviderResponse`] is the only place the two
//! shapes are reconciled.

mod client;
mod config;
pub mod types;

pub use client::ProviderClient;
pub use config::{
    ClientConfig, DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_OPENAI_BASE_URL, DEFAULT_TIMEOUT_MS,
    MAX_COMPLETION_TOKENS,
};

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Anthropic Claude messages API.
    Anthropic,
    /// OpenAI chat completions API.
    OpenAi,
}

impl Provider {
    /// Returns the provider name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
        }
    }

    /// Returns all supported providers.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Anthropic, Self::OpenAi]
    }

    /// The prefix a well-formed API key for this provider carries.
    ///
    /// Anthropic keys start with `sk-ant-`; OpenAI keys with `sk-`.
    /// Checked locally before any network call so an obviously
    /// mis-pasted key never leaves the machine.
    #[must_use]
    pub const fn key_prefix(&self) -> &'static str {
        match self {
            Self::Anthropic => "sk-ant-",
            Self::OpenAi => "sk-",
        }
    }

    /// The default model identifier sent when none is configured.
    #[must_use]
    pub const fn default_model(&self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-20250514",
            Self::OpenAi => "gpt-4",
        }
    }

    /// The completion endpoint path appended to the base URL.
    #[must_use]
    pub const fn endpoint_path(&self) -> &'static str {
        match self {
            Self::Anthropic => "/messages",
            Self::OpenAi => "/chat/completions",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            _ => Err(ParseProviderError {
                input: s.to_string(),
            }),
        }
    }
}

/// Error when parsing a provider from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProviderError {
    /// The input that failed to parse.
    pub input: String,
}

impl std::fmt::Display for ParseProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown provider: '{}'. Valid providers: {}",
            self.input,
            Provider::all()
                .iter()
                .map(Provider::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseProviderError {}
