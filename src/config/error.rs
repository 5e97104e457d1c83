//! Configuration error types

use thiserror::Error;

/// Failure to produce a usable [`AppConfig`](super::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration from the environment: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

/// A loaded value that the service cannot run with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingRequired(&'static str),

    #[error("server.port must not be 0")]
    InvalidPort,

    #[error("server.log_level '{0}' is not a valid filter directive")]
    InvalidLogFilter(String),

    #[error("redis.url is not a valid Redis URL: {0}")]
    InvalidRedisUrl(String),

    #[error("{0} must be positive")]
    InvalidTimeout(&'static str),

    #[error("retry.attempts must be between 1 and {max}")]
    InvalidRetryAttempts { max: u32 },

    #[error("retry.backoff must be a finite number >= 1.0")]
    InvalidBackoff,

    #[error("dispatch.max_in_flight must be between 1 and {max}")]
    InvalidMaxInFlight { max: usize },
}
