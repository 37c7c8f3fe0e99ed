//! Exponential backoff retry
//!
//! Deterministic, jitter-free backoff: retry `k` (0-indexed, counted after the
//! first failure) waits `min(base_delay * backoff_factor^k, max_delay)`.

use bon::Builder;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry count and delay tuning
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct RetryPolicy {
    /// Retries after the initial attempt; total attempts = `max_retries + 1`
    #[builder(default = 3)]
    pub max_retries: u32,
    #[builder(default = Duration::from_millis(1000))]
    pub base_delay: Duration,
    #[builder(default = Duration::from_millis(10_000))]
    pub max_delay: Duration,
    #[builder(default = 2.0)]
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RetryPolicy {
    /// Delay before retry `retry_index` (0 = first retry)
    pub fn delay_for(&self, retry_index: u32) -> Duration {
        let exponent = i32::try_from(retry_index).unwrap_or(i32::MAX);
        let scaled_nanos = self.base_delay.as_nanos() as f64 * self.backoff_factor.powi(exponent);

        if !scaled_nanos.is_finite() || scaled_nanos >= self.max_delay.as_nanos() as f64 {
            return self.max_delay;
        }

        Duration::from_nanos(scaled_nanos.round() as u64).min(self.max_delay)
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Run `operation` until it succeeds or the policy is exhausted.
///
/// Every failure is retried. The last error is returned once
/// `max_retries` retries have been spent.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry_with_backoff_if(policy, operation, |_| true).await
}

/// Like [`retry_with_backoff`], but stops early when `should_retry` rejects
/// an error.
pub async fn retry_with_backoff_if<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let mut retry_index = 0u32;

    loop {
        match operation().await {
            Ok(value) => {
                if retry_index > 0 {
                    debug!(attempts = retry_index + 1, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                let attempts = retry_index + 1;

                if retry_index >= policy.max_retries {
                    warn!(attempts, error = %e, "Operation failed, retries exhausted");
                    return Err(e);
                }

                if !should_retry(&e) {
                    warn!(attempts, error = %e, "Operation failed with non-retryable error");
                    return Err(e);
                }

                let delay = policy.delay_for(retry_index);
                warn!(attempts, ?delay, error = %e, "Operation failed, retrying");
                tokio::time::sleep(delay).await;

                retry_index += 1;
            }
        }
    }
}
