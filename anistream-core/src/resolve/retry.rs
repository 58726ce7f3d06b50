//! Transient-retry wrapper
//!
//! Bounded retry with a fixed inter-attempt delay around a single fallible
//! async operation. The delay is deliberately fixed rather than
//! exponential: attempt counts are low and the callers are client-side
//! lookups against flaky third-party HTTP endpoints.

use std::future::Future;
use std::time::Duration;

/// Classification of whether retrying the same call could succeed.
pub trait TransientError {
    fn is_transient(&self) -> bool;
}

/// Retry budget for one provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total invocation budget, including the first attempt. Minimum 1.
    pub max_attempts: u32,
    /// Fixed suspension between attempts; never applied after the last.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::from_millis(1000),
        }
    }
}

/// One operation gave up: either its retry budget ran out, or it failed
/// with an error that retrying cannot fix.
#[derive(Debug, thiserror::Error)]
#[error("{description}: retries exhausted: {last_error}")]
pub struct RetryExhausted<E>
where
    E: std::error::Error + 'static,
{
    pub description: String,
    #[source]
    pub last_error: E,
}

/// Invoke `operation` up to `policy.max_attempts` times, sleeping
/// `policy.delay` between attempts.
///
/// Returns the first successful result. Non-transient errors short-circuit
/// immediately: burning the remaining budget on a malformed response would
/// only delay the fallback to the next provider.
pub async fn retry<T, E, F, Fut>(
    policy: RetryPolicy,
    description: &str,
    mut operation: F,
) -> Result<T, RetryExhausted<E>>
where
    E: TransientError + std::error::Error + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < max_attempts => {
                tracing::warn!(
                    error = %err,
                    attempt,
                    max_attempts,
                    "{description} failed, retrying after delay"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(err) => {
                tracing::warn!(error = %err, attempt, "{description} failed, giving up");
                return Err(RetryExhausted {
                    description: description.to_string(),
                    last_error: err,
                });
            }
        }
    }
}
