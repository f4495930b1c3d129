use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// A single failed attempt record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAttempt {
    /// 1-based attempt number.
    pub attempt: u32,
    /// Error message from the failed attempt.
    pub error: String,
}

impl RetryAttempt {
    pub fn new(attempt: u32, error: impl Into<String>) -> Self {
        Self {
            attempt,
            error: error.into(),
        }
    }
}

/// Returned when every attempt allowed by a [`RetryPolicy`] failed.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    /// Number of attempts made.
    pub attempts: u32,
    /// Error of the final attempt.
    pub error: E,
    /// One record per failed attempt, oldest first.
    pub history: Vec<RetryAttempt>,
}

/// Bounded retry with exponential backoff and no jitter.
///
/// The delay before attempt `k` (k >= 2) is `base_delay * 2^(k-2)`, so with a
/// one second base the second attempt waits 1s and the third waits 2s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait before the given 1-based attempt.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(attempt - 2);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    ///
    /// `op` receives the 1-based attempt number. Every error is treated as
    /// retryable; callers that need to give up early should return `Ok` with
    /// their own failure value.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut history = Vec::new();
        let mut attempt = 1;

        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %error,
                        "Attempt failed"
                    );
                    history.push(RetryAttempt::new(attempt, error.to_string()));

                    if attempt >= self.max_attempts {
                        return Err(RetryExhausted {
                            attempts: attempt,
                            error,
                            history,
                        });
                    }

                    attempt += 1;
                    tokio::time::sleep(self.delay_before(attempt)).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    /// Three attempts, one second base delay.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}
