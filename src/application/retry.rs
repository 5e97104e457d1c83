//! Retry executor used around every store, cache and channel call.
//!
//! Delay before attempt `n + 1` is `delay * backoff^(n - 1)`. With the
//! default `backoff = 1.0` that is a fixed delay. No jitter.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::config::RetryConfig;

/// Bounded retry with exponential (or fixed) backoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryStrategy {
    attempts: u32,
    delay: Duration,
    backoff: f64,
}

impl RetryStrategy {
    /// Creates a strategy. `attempts` below one is raised to one and a
    /// negative or non-finite `backoff` falls back to a fixed delay.
    pub fn new(attempts: u32, delay: Duration, backoff: f64) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
            backoff: if backoff.is_finite() && backoff >= 0.0 { backoff } else { 1.0 },
        }
    }

    /// A single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, 1.0)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Sleep that follows failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.backoff.powi(exponent);
        Duration::try_from_secs_f64(self.delay.as_secs_f64() * factor).unwrap_or(Duration::MAX)
    }

    /// Runs `op` until it succeeds or attempts run out, retrying every error.
    pub async fn run<T, E, F, Fut>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        self.run_if(op, |_| true).await
    }

    /// Like [`run`](Self::run) but gives up at once on errors for which
    /// `retryable` returns false.
    pub async fn run_if<T, E, F, Fut, P>(&self, mut op: F, retryable: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= self.attempts || !retryable(&err) => return Err(err),
                Err(err) => {
                    let delay = self.delay_for(attempt);
                    tracing::debug!(
                        attempt,
                        max_attempts = self.attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Attempt failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryStrategy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryStrategy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.attempts,
            Duration::from_millis(config.delay_ms),
            config.backoff,
        )
    }
}
