//! Exponential backoff retry for transient Provider failures.

use crate::error::{DirectoryError, DirectoryResult};
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy configuration.
///
/// Only transient external-API errors are retried; structural failures
/// (malformed or empty payloads) return immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts (0 = no retries).
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
    /// Maximum delay cap in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given retry count and base delay; the delay
    /// cap defaults to 30 seconds.
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms: 30_000,
        }
    }

    /// Whether the error should be retried at the given attempt number.
    pub fn should_retry(&self, attempt: u32, error: &DirectoryError) -> bool {
        attempt < self.max_retries && error.is_transient()
    }

    /// Delay for the given attempt: `min(base * 2^attempt, max)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(exponential.min(self.max_delay_ms))
    }

    /// Execute an async operation with retry.
    ///
    /// The closure is called until it succeeds, a non-transient error is
    /// hit, or the retry budget is exhausted; the final error is returned
    /// as-is so the caller's skip policy sees the original classification.
    pub async fn execute<F, Fut, T>(&self, operation: &str, mut f: F) -> DirectoryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = DirectoryResult<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(operation, attempt = attempt + 1, "Operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !self.should_retry(attempt, &error) {
                        if error.is_transient() && attempt >= self.max_retries {
                            warn!(
                                operation,
                                attempts = attempt + 1,
                                error = %error,
                                "Retry budget exhausted"
                            );
                        }
                        return Err(error);
                    }

                    let delay = self.delay_for(attempt);
                    debug!(
                        operation,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
