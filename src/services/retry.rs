use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Retry policy for calls against unreliable backends
///
/// Attempt `k` (1-based) waits `base_delay * (k - 1)` before running, so the
/// first attempt is immediate and later ones back off linearly. Every attempt
/// runs under its own `attempt_timeout`, independent of the backoff delay.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay slept before the given 1-based attempt
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay * attempt.saturating_sub(1)
    }

    /// Runs `operation` until it succeeds or attempts run out
    ///
    /// The last attempt's error is returned to the caller.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let delay = self.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let result = match tokio::time::timeout(self.attempt_timeout, call()).await {
                Ok(result) => result,
                Err(_) => Err(AppError::Timeout(self.attempt_timeout)),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= max_attempts => {
                    tracing::warn!(
                        operation = %operation,
                        attempts = attempt,
                        error = %e,
                        "Giving up after final attempt"
                    );
                    return Err(e);
                }
                Err(e) => {
                    tracing::debug!(
                        operation = %operation,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    attempt += 1;
                }
            }
        }
    }
}
