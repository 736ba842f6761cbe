//! Request gates: sanitization, injection scanning, and rate limiting.
//!
//! Every gate here runs before any network traffic. The sanitizer rewrites
//! input; the detector and limiter only accept or reject.

mod inject;
mod rate;
mod sanitize;

pub use inject::InjectionDetector;
pub use rate::{RateLimiter, RateWindow, RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_MS};
pub use sanitize::Sanitizer;

use regex::Regex;

use crate::error::GuardError;

/// Compile one pattern, carrying the pattern text into the error.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, GuardError> {
    Regex::new(pattern).map_err(|e| GuardError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}
