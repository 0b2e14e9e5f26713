//! Bounded retry with linear backoff
//!
//! `with_retry` runs any fallible async operation up to `max_attempts` times,
//! sleeping `base_delay * attempt` between failures. It knows nothing about
//! caching or HTTP; callers decide what to wrap.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Default number of attempts, including the first
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the second attempt
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// How many times to try and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; zero is treated as one
    pub max_attempts: u32,
    /// Delay after the first failure; the n-th failure waits `n * base_delay`
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Policy that runs the operation exactly once
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Runs `operation` until it succeeds or the policy's attempts are used up.
///
/// Every error is retried. The error from the final attempt is returned as is.
pub async fn with_retry<T, E, F, Fut>(operation: F, policy: &RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    with_retry_if(operation, policy, |_| true).await
}

/// Like [`with_retry`], but only retries errors for which `should_retry` returns true.
///
/// A rejected error is returned immediately without waiting.
pub async fn with_retry_if<T, E, F, Fut, P>(
    mut operation: F,
    policy: &RetryPolicy,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::warn!(attempt, max_attempts, error = %err, "attempt failed");

                if attempt >= max_attempts || !should_retry(&err) {
                    return Err(err);
                }

                let delay = policy.delay_for(attempt);
                tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use thiserror::Error;
    use tokio::time::Instant;

    #[derive(Debug, Error, PartialEq, Eq)]
    enum TestError {
        #[error("transient failure #{0}")]
        Transient(u32),
        #[error("permanent failure")]
        Permanent,
    }

    fn test_policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1000))
    }

    #[test]
    fn test_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_linear_delay_schedule() {
        let policy = test_policy();
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_with_linear_delays() {
        let calls = Arc::new(Mutex::new(Vec::new()));

        let result = with_retry(
            || {
                let calls = Arc::clone(&calls);
                async move {
                    let mut calls = calls.lock().unwrap();
                    calls.push(Instant::now());
                    if calls.len() < 3 {
                        Err(TestError::Transient(calls.len() as u32))
                    } else {
                        Ok("movies")
                    }
                }
            },
            &test_policy(),
        )
        .await;

        assert_eq!(result, Ok("movies"));

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1] - calls[0], Duration::from_millis(1000));
        assert_eq!(calls[2] - calls[1], Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_returns_last_error() {
        let counter = AtomicU32::new(0);

        let result: Result<(), TestError> = with_retry(
            || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err(TestError::Transient(n)) }
            },
            &test_policy(),
        )
        .await;

        assert_eq!(result, Err(TestError::Transient(3)));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_does_not_wait() {
        let counter = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<u32, TestError> = with_retry(
            || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(7) }
            },
            &test_policy(),
        )
        .await;

        assert_eq!(result, Ok(7));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_total_wait_for_exhausted_attempts() {
        let start = Instant::now();

        let _: Result<(), TestError> =
            with_retry(|| async { Err(TestError::Permanent) }, &test_policy()).await;

        // 1s after the first failure, 2s after the second, none after the last
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_predicate_stops_on_permanent_error() {
        let counter = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), TestError> = with_retry_if(
            || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(TestError::Permanent) }
            },
            &test_policy(),
            |err| matches!(err, TestError::Transient(_)),
        )
        .await;

        assert_eq!(result, Err(TestError::Permanent));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_predicate_allows_transient_errors() {
        let counter = AtomicU32::new(0);

        let result = with_retry_if(
            || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == 1 {
                        Err(TestError::Transient(n))
                    } else {
                        Ok(n)
                    }
                }
            },
            &test_policy(),
            |err| matches!(err, TestError::Transient(_)),
        )
        .await;

        assert_eq!(result, Ok(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_runs_once() {
        let counter = AtomicU32::new(0);

        let result: Result<(), TestError> = with_retry(
            || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(TestError::Permanent) }
            },
            &RetryPolicy::new(0, Duration::from_millis(10)),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_retry_policy() {
        let counter = AtomicU32::new(0);

        let _: Result<(), TestError> = with_retry(
            || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(TestError::Permanent) }
            },
            &RetryPolicy::no_retry(),
        )
        .await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
