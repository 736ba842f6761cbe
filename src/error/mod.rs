//! Error types for the script generation pipeline.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`FileError`]: Staged-file validation and metadata extraction errors
//! - [`GateError`]: Local input-rejection errors raised before any network call
//! - [`GuardError`]: Pattern-table construction errors
//! - [`ProviderError`]: LLM provider API errors
//! - [`ScriptError`]: Response-shape and script-safety errors
//! - [`ConfigError`]: Configuration errors
//!
//! All errors implement `Send + Sync` for async compatibility.

use thiserror::Error;

/// Top-level application error.
///
/// This is the main error type returned by public API functions.
/// It wraps all subsystem errors for unified error handling.
#[derive(Debug, Error)]
pub enum AppError {
    /// File validation or metadata extraction error.
    #[error("File error: {0}")]
    File(#[from] FileError),

    /// Request rejected by a local gate.
    #[error("Request rejected: {0}")]
    Gate(#[from] GateError),

    /// Pattern table construction error.
    #[error("Pattern error: {0}")]
    Guard(#[from] GuardError),

    /// Provider API error.
    #[error("Provider API error: {0}")]
    Provider(#[from] ProviderError),

    /// Script validation error.
    #[error("Script validation error: {0}")]
    Script(#[from] ScriptError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// File errors.
///
/// Raised when a staged file fails the acceptance gate, its metadata
/// cannot be read, or the generated script cannot be written. Validation
/// rejections name the file and the constraint that was violated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FileError {
    /// File extension is not one of the accepted formats.
    #[error("Unsupported file type: {file} (allowed: .csv, .xls, .xlsx)")]
    UnsupportedType {
        /// Name of the rejected file.
        file: String,
    },

    /// File exceeds the size limit.
    #[error("File too large: {file} is {size_bytes} bytes (limit {limit_bytes})")]
    TooLarge {
        /// Name of the rejected file.
        file: String,
        /// Actual size in bytes.
        size_bytes: u64,
        /// Maximum accepted size in bytes.
        limit_bytes: u64,
    },

    /// File could not be read from disk.
    #[error("Failed to read {file}: {message}")]
    ReadFailed {
        /// Name of the unreadable file.
        file: String,
        /// Description of the IO failure.
        message: String,
    },

    /// Generated script could not be written to disk.
    #[error("Failed to write {file}: {message}")]
    WriteFailed {
        /// Name of the output file.
        file: String,
        /// Description of the IO failure.
        message: String,
    },
}

/// Local input-rejection errors.
///
/// These are resolved entirely before any network call and their Display
/// strings are safe to show to the user as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// Requirement text is empty after sanitization.
    #[error("Requirement is empty")]
    EmptyRequirement,

    /// Requirement text exceeds the length limit after sanitization.
    #[error("Requirement is {length} characters, maximum is {max}")]
    RequirementTooLong {
        /// Post-sanitization character count.
        length: usize,
        /// Maximum accepted character count.
        max: usize,
    },

    /// API key does not carry the provider's expected prefix.
    #[error("API key does not match the expected format for {provider}")]
    InvalidApiKey {
        /// Name of the selected provider.
        provider: String,
    },

    /// Input matched a suspicious instruction or code pattern.
    #[error("Request blocked: {category} pattern detected")]
    InjectionDetected {
        /// Category of the matched pattern.
        category: String,
    },

    /// Too many requests inside the sliding window.
    #[error("Too many requests: wait {wait_seconds}s before retrying")]
    RateLimited {
        /// Seconds until the oldest in-window request ages out.
        wait_seconds: u64,
    },
}

/// Pattern-table construction errors.
///
/// The sanitizer, injection detector, and import scanner compile their
/// regex tables in fallible constructors; a compile failure surfaces here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// A detection pattern failed to compile.
    #[error("Invalid detection pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern source text.
        pattern: String,
        /// Description of the compile failure.
        message: String,
    },
}

/// Provider API errors.
///
/// These errors represent failures when communicating with the selected
/// LLM provider. Raw upstream detail lives in the variant fields for
/// logging; [`ProviderError::user_message`] gives the fixed string shown
/// to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Authentication failed due to invalid API key.
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Request was rate limited by the provider.
    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_seconds: u64,
    },

    /// Invalid request parameters.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of what's invalid.
        message: String,
    },

    /// The provider returned a server-side error status.
    #[error("Server error: status {status}")]
    ServerError {
        /// The HTTP status code.
        status: u16,
    },

    /// Request timed out.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// Unexpected response from the API.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Description of what was unexpected.
        message: String,
    },
}

impl ProviderError {
    /// Returns true if this error is retryable.
    ///
    /// Rate limiting, server errors, timeouts, and network failures are
    /// retryable. Authentication and invalid request errors are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::ServerError { .. }
                | Self::Timeout { .. }
                | Self::Network { .. }
        )
    }

    /// The fixed user-facing message for this error class.
    ///
    /// Upstream bodies and transport detail stay in the logs; the user
    /// sees only one of these strings.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "Invalid API key. Check your key and provider selection.",
            Self::RateLimited { .. } => "Rate limit exceeded. Please retry later.",
            Self::InvalidRequest { .. } => {
                "Invalid request. Please adjust your description and try again."
            }
            Self::ServerError { .. } => "The provider is having trouble. Please try again later.",
            Self::Timeout { .. } | Self::Network { .. } => {
                "Could not reach the provider. Check your connection and try again."
            }
            Self::UnexpectedResponse { .. } => {
                "The provider returned an unexpected response. Please try again."
            }
        }
    }
}

/// Response-shape and script-safety errors.
///
/// Raised after a successful API exchange when the returned payload is
/// structurally incomplete, unparseable, or fails the import safety scan.
/// Raw model output is never carried in these variants; it is logged at
/// debug level where the failure is detected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// JSON parsing failed on the model response.
    #[error("JSON parsing failed: {message}")]
    JsonParseFailed {
        /// Description of the parsing error.
        message: String,
    },

    /// A required field is absent from the parsed response.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// The generated script references a disallowed module.
    #[error("Script uses disallowed module: {module}")]
    DisallowedImport {
        /// The disallowed module name.
        module: String,
    },
}

impl ScriptError {
    /// The fixed user-facing message for this error class.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::JsonParseFailed { .. } => {
                "Could not parse the model response into a script. Please try again or rephrase."
            }
            Self::MissingField { .. } => {
                "The model response was incomplete. Please try again or rephrase."
            }
            Self::DisallowedImport { .. } => {
                "The generated script used a disallowed module. Please rephrase your request."
            }
        }
    }
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}
