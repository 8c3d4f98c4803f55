//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::error::TransportError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs a closure until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, TransportError>
where
    F: FnMut() -> Result<T, TransportError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::warn!(attempt, error = %e, "request failed; retrying in {:?}", d);
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn retries_throttled_until_success() {
        let mut calls = 0;
        let out = run_with_retry(&fast_policy(5), || {
            calls += 1;
            if calls < 3 {
                Err(TransportError::Http {
                    code: 503,
                    detail: None,
                })
            } else {
                Ok(calls)
            }
        })
        .unwrap();
        assert_eq!(out, 3);
    }

    #[test]
    fn gives_up_on_not_found() {
        let mut calls = 0;
        let err = run_with_retry(&fast_policy(5), || -> Result<(), _> {
            calls += 1;
            Err(TransportError::Http {
                code: 404,
                detail: None,
            })
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert_eq!(err.http_status(), Some(404));
    }

    #[test]
    fn stops_after_max_attempts() {
        let mut calls = 0;
        let _ = run_with_retry(&fast_policy(2), || -> Result<(), _> {
            calls += 1;
            Err(TransportError::Http {
                code: 500,
                detail: None,
            })
        });
        assert_eq!(calls, 2);
    }
}
