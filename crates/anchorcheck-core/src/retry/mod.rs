//! Retry and backoff policy for calls to the anchoring backend.
//!
//! Transport failures (timeouts, throttling, connection resets) are
//! classified here and retried with exponential backoff so the record
//! lookup, chunk count and chunk downloads share one consistent policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::TransportError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
