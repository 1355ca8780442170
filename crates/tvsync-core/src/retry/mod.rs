//! Retry and backoff policy for feed downloads.
//!
//! Error classification (timeouts, transfer failures, retryable 5xx) and
//! exponential backoff decisions live here so the fetcher only has to supply
//! a single-attempt closure.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
