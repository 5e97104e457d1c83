//! Retry configuration for store, cache and channel calls

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_ATTEMPTS: u32 = 20;

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per call, including the first
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Delay after the first failed attempt, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Multiplier applied to the delay after each further failure
    #[serde(default = "default_backoff")]
    pub backoff: f64,
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Validate retry configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.attempts == 0 || self.attempts > MAX_ATTEMPTS {
            return Err(ValidationError::InvalidRetryAttempts { max: MAX_ATTEMPTS });
        }
        if !self.backoff.is_finite() || self.backoff < 1.0 {
            return Err(ValidationError::InvalidBackoff);
        }
        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay_ms: default_delay_ms(),
            backoff: default_backoff(),
        }
    }
}

fn default_attempts() -> u32 {
    3
}

fn default_delay_ms() -> u64 {
    500
}

fn default_backoff() -> f64 {
    1.0
}
