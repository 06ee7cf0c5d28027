/// Bounded retry around one remote-call-plus-assemble cycle.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::core::extract::ExtractError;
use crate::core::provider::ProviderError;

/// Why a single attempt failed. Both kinds are retried the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("provider: {0}")]
    Provider(#[from] ProviderError),
    #[error("extraction: {0}")]
    Extract(#[from] ExtractError),
}

/// Every attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed after {attempts} attempts, last error: {last_error}")]
pub struct TerminalFailure {
    pub operation: &'static str,
    pub attempts: u32,
    pub last_error: AttemptError,
}

/// How many times to try, and how long each try may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Treated as at least 1.
    pub max_attempts: u32,
    /// Limit on a single attempt. `None` waits as long as the provider does.
    pub attempt_timeout: Option<Duration>,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            attempt_timeout: None,
        }
    }

    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.attempt_timeout = Some(limit);
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

/// Runs `attempt_fn` until it succeeds or the policy's attempts run out.
///
/// Attempts are sequential and immediate, with no backoff. `attempt_fn`
/// receives the 1-based attempt number and must do the whole cycle
/// (fresh remote call, then assembly) so each retry sees newly generated
/// text. A timed-out attempt counts as a provider failure. Dropping the
/// returned future abandons any remaining attempts.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut attempt_fn: F,
) -> Result<T, TerminalFailure>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        tracing::debug!(attempt, max_attempts, operation, "starting attempt");

        let result = match policy.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, attempt_fn(attempt))
                .await
                .unwrap_or(Err(AttemptError::Provider(ProviderError::Timeout(limit)))),
            None => attempt_fn(attempt).await,
        };

        match result {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt, operation, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) if attempt < max_attempts => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    error = %error,
                    operation,
                    "attempt failed, retrying"
                );
                attempt += 1;
            }
            Err(error) => {
                tracing::error!(
                    attempts = attempt,
                    error = %error,
                    operation,
                    "all attempts failed"
                );
                return Err(TerminalFailure {
                    operation,
                    attempts: attempt,
                    last_error: error,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn missing(tag: &str) -> AttemptError {
        AttemptError::Extract(ExtractError::TagMissing(tag.to_string()))
    }

    #[tokio::test]
    async fn succeeds_on_third_attempt() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&RetryPolicy::new(3), "test", |attempt| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            assert_eq!(n, attempt);
            async move {
                if attempt < 3 {
                    Err(missing("scenario"))
                } else {
                    Ok("done")
                }
            }
        })
        .await;
        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&RetryPolicy::new(3), "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AttemptError::Provider(ProviderError::RequestFailed("503".to_string()))) }
        })
        .await;
        let failure = result.unwrap_err();
        assert_eq!(failure.attempts, 3);
        assert_eq!(
            failure.last_error,
            AttemptError::Provider(ProviderError::RequestFailed("503".to_string()))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn first_success_makes_one_call() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&RetryPolicy::default(), "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, AttemptError>(7) }
        })
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&RetryPolicy::new(0), "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(missing("summary")) }
        })
        .await;
        assert_eq!(result.unwrap_err().attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn last_error_is_reported() {
        let policy = RetryPolicy::new(2);
        let result: Result<(), _> = with_retry(&policy, "scenario", |attempt| async move {
            if attempt == 1 {
                Err(AttemptError::Provider(ProviderError::InvalidResponse(
                    "empty".to_string(),
                )))
            } else {
                Err(missing("choice2Stats"))
            }
        })
        .await;
        let failure = result.unwrap_err();
        assert_eq!(failure.last_error, missing("choice2Stats"));
        assert!(failure.to_string().contains("scenario failed after 2 attempts"));
    }

    #[tokio::test]
    async fn slow_attempts_time_out() {
        let limit = Duration::from_millis(20);
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(2).with_timeout(limit);
        let result: Result<(), _> = with_retry(&policy, "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            }
        })
        .await;
        let failure = result.unwrap_err();
        assert_eq!(
            failure.last_error,
            AttemptError::Provider(ProviderError::Timeout(limit))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
