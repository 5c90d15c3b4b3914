//! Generic exponential-backoff retry primitive (§9 design note).
//!
//! One primitive, parameterised by `(maxAttempts, initialDelay, multiplier,
//! maxDelay, isRetryable)`, backs both the Processor's per-log publish
//! retry and the Syncer's batch retry — each instantiated with its own
//! policy.

use std::time::Duration;

use tracing::warn;

use crate::error::AppError;

/// A backoff policy: how many attempts, how long to wait between them, and
/// how fast the wait grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Factor the delay grows by after each failed attempt.
    pub multiplier: f64,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// The Processor's per-log publish-retry policy (§4.6): initial 1s,
    /// doubling, capped at 30s, at least 3 attempts.
    #[must_use]
    pub const fn publish_retry() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }

    /// The Syncer's batch-retry policy (§9 open question: a separate,
    /// longer-capped budget than the per-log policy): fixed 5s delay, many
    /// more attempts, capped at 5 minutes.
    #[must_use]
    pub const fn batch_retry() -> Self {
        Self {
            max_attempts: 20,
            initial_delay: Duration::from_secs(5),
            multiplier: 1.5,
            max_delay: Duration::from_secs(300),
        }
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let scaled = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        Duration::from_secs_f64(scaled.min(self.max_delay.as_secs_f64()))
    }
}

/// Run `op`, retrying per `policy` while the returned error is transient
/// (per [`AppError::is_transient`]) and attempts remain. Sleeps between
/// attempts using `tokio::time::sleep`.
///
/// Returns the first success, or the last error once attempts are
/// exhausted or the error is classified permanent.
pub async fn retry<T, F, Fut>(policy: RetryPolicy, label: &str, mut op: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < policy.max_attempts => {
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    operation = label,
                    attempt = attempt + 1,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::error::InfraError;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 4,
            initial_delay: Duration::from_millis(1),
            multiplier: 1.0,
            max_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn succeeds_on_first_try_without_retry() {
        let calls = AtomicU32::new(0);
        let result = retry(fast_policy(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, AppError>(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let calls = AtomicU32::new(0);
        let result = retry(fast_policy(), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(AppError::Infra(InfraError::RpcTransient(
                        "temporary".into(),
                    )))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result = retry(fast_policy(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<(), _>(AppError::Infra(InfraError::RpcTransient("down".into())))
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result = retry(fast_policy(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(AppError::Infra(InfraError::RpcPermanent("bad".into()))) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
