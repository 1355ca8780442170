use std::time::Duration;

use crate::config::RetryConfig;

/// High-level classification of a failed attempt for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request timed out (connect/read).
    Timeout,
    /// Any other transfer failure: connection refused/reset, DNS, bad reply, decoding.
    Connection,
    /// One of the retryable gateway/server statuses: 500, 502, 503, 504.
    Http5xx(u16),
    /// Request could not be built, or a final HTTP status; not retried.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Exponential backoff: the wait after failed attempt `n` (0-based) is
/// `backoff_factor * 2^n`, capped at `max_delay`. Policies built from config
/// are uncapped.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub backoff_factor: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: Duration::from_secs(1),
            max_delay: Duration::MAX,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        Self {
            max_retries: cfg.max_retries,
            backoff_factor: Duration::try_from_secs_f64(cfg.backoff_factor_secs)
                .unwrap_or(Duration::ZERO),
            ..Self::default()
        }
    }
}

impl RetryPolicy {
    /// Policy that retries without sleeping. Used by tests.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff_factor: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Decide what to do after attempt `attempt` (0-based) failed with `kind`.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_retries {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Timeout | ErrorKind::Connection | ErrorKind::Http5xx(_) => {
                let exp = 1u32 << attempt.min(16);
                let delay = self.backoff_factor.saturating_mul(exp).min(self.max_delay);
                RetryDecision::RetryAfter(delay)
            }
        }
    }
}
