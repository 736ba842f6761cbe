//! Redacting wrapper for provider API keys.

use std::fmt;

/// A string that never shows its value in `Debug` or `Display` output.
///
/// The provider API key travels through [`Config`](super::Config), the
/// request pipeline, and the HTTP client, all of which log their state.
/// Holding the key in this wrapper means any of those can be formatted
/// without leaking it; only [`expose`](Self::expose) reaches the raw text.
///
/// # Example
///
/// ```
/// use pycture::config::SecretString;
///
/// let key = SecretString::new("sk-ant-api03-key-123");
/// assert_eq!(format!("{key:?}"), "<REDACTED>");
/// assert_eq!(key.expose(), "sk-ant-api03-key-123");
/// ```
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret, for building request headers.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the secret starts with the given prefix.
    ///
    /// The key-format gate checks the provider prefix through this without
    /// pulling the raw key to the call site.
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Whether the secret is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the secret in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<REDACTED>")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_expose() {
        let key = "sk-ant-REDACTED";
        assert_eq!(SecretString::new(key).expose(), key);
    }

    #[test]
    fn test_from_string_and_str() {
        let from_string: SecretString = String::from("sk-key").into();
        let from_str: SecretString = "sk-key".into();
        assert_eq!(from_string, from_str);
    }

    #[test]
    fn test_debug_and_display_redact() {
        let key = SecretString::new("sk-ant-do-not-log-me");
        for rendered in [format!("{key:?}"), format!("{key}")] {
            assert_eq!(rendered, "<REDACTED>");
            assert!(!rendered.contains("do-not-log-me"));
        }
    }

    #[test]
    fn test_starts_with_distinguishes_provider_prefixes() {
        let anthropic_key = SecretString::new("sk-ant-api03-abc");
        let openai_key = SecretString::new("sk-proj-abc");
        assert!(anthropic_key.starts_with("sk-ant-"));
        assert!(anthropic_key.starts_with("sk-"));
        assert!(openai_key.starts_with("sk-"));
        assert!(!openai_key.starts_with("sk-ant-"));
    }

    #[test]
    fn test_clone_and_eq() {
        let key = SecretString::new("sk-same");
        assert_eq!(key, key.clone());
        assert_ne!(key, SecretString::new("sk-other"));
    }

    #[test]
    fn test_is_empty_and_len() {
        assert!(SecretString::new("").is_empty());
        let key = SecretString::new("12345");
        assert!(!key.is_empty());
        assert_eq!(key.len(), 5);
    }
}
