//! Sliding-window request rate limiting.

use crate::error::GateError;

/// Maximum requests allowed inside one window.
pub const RATE_LIMIT_MAX_REQUESTS: usize = 10;

/// Window length in milliseconds.
pub const RATE_LIMIT_WINDOW_MS: i64 = 60_000;

/// Request timestamps for one session, in epoch milliseconds.
///
/// The caller owns this state and passes it to [`RateLimiter::check`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateWindow {
    stamps: Vec<i64>,
}

impl RateWindow {
    /// Create an empty window.
    #[must_use]
    pub const fn new() -> Self {
        Self { stamps: Vec::new() }
    }

    /// Number of timestamps currently recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    /// Whether no timestamps are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

/// Sliding-window rate limiter over caller-held [`RateWindow`] state.
///
/// This throttles a single session's request volume. It is not a security
/// boundary: the window lives with the caller, who can reset it.
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    max_requests: usize,
    window_ms: i64,
}

impl RateLimiter {
    /// Create a limiter with an explicit request cap and window length.
    #[must_use]
    pub const fn new(max_requests: usize, window_ms: i64) -> Self {
        Self {
            max_requests,
            window_ms,
        }
    }

    /// Admit or reject a request arriving at `now_ms`.
    ///
    /// Expired timestamps are dropped from the window at check time. When
    /// the window is full the request is rejected, the window is left
    /// without the rejected attempt recorded, and the error reports how
    /// many seconds remain until the oldest recorded request expires.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::RateLimited`] when the window already holds
    /// the maximum number of requests.
    pub fn check(&self, window: &mut RateWindow, now_ms: i64) -> Result<(), GateError> {
        let cutoff = now_ms - self.window_ms;
        window.stamps.retain(|&stamp| stamp > cutoff);

        if window.stamps.len() >= self.max_requests {
            let oldest = window.stamps.iter().copied().min().unwrap_or(now_ms);
            let wait_ms = oldest + self.window_ms - now_ms;
            let wait_seconds = u64::try_from((wait_ms + 999) / 1000).unwrap_or(1).max(1);
            tracing::debug!(
                recorded = window.stamps.len(),
                wait_seconds,
                "Request rejected by rate limiter"
            );
            return Err(GateError::RateLimited { wait_seconds });
        }

        window.stamps.push(now_ms);
        Ok(())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_MS)
    }
}
