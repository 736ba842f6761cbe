//! Trait definitions for mockable dependencies.
//!
//! This module defines traits for:
//! - [`CompletionBackend`]: LLM completion client abstraction
//! - [`TimeProvider`]: Time abstraction for testing
//!
//! # Mocking
//!
//! All traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.
//!
//! # Example
//!
//! ```
//! use pycture::traits::{TimeProvider, RealTimeProvider};
//!
//! let time_provider = RealTimeProvider;
//! let now = time_provider.now();
//! println!("Current time: {now}");
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ProviderError;

/// Completion backend trait for mocking.
///
/// This trait abstracts the LLM provider client so the request pipeline
/// can be driven by mock implementations in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send a single completion request and return the response text.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the API call fails.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Time provider trait for deterministic testing.
///
/// This trait abstracts time operations to allow for
/// deterministic testing by providing fixed timestamps.
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real time provider using system clock.
///
/// This is the production implementation that returns the actual current time.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
