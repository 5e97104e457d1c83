//! Shared command cache connection settings.
//!
//! Present only when command ids must be deduplicated across service
//! instances; otherwise each instance keeps its own in-memory cache.

use std::time::Duration;

use redis::IntoConnectionInfo;
use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// `redis://`, `rediss://` or `unix://` URL
    pub url: String,

    /// Upper bound on establishing the connection at startup
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Checks the URL with the same parser the client uses, without connecting.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("redis.url"));
        }
        self.url
            .as_str()
            .into_connection_info()
            .map_err(|e| ValidationError::InvalidRedisUrl(e.to_string()))?;
        if self.connect_timeout_ms == 0 {
            return Err(ValidationError::InvalidTimeout("redis.connect_timeout_ms"));
        }
        Ok(())
    }
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_tcp_and_tls_urls() {
        assert!(RedisConfig::new("redis://localhost:6379/0").validate().is_ok());
        assert!(RedisConfig::new("rediss://cache.internal:6380").validate().is_ok());
        assert_eq!(
            RedisConfig::new("redis://localhost").connect_timeout(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn empty_url_is_missing() {
        assert_eq!(
            RedisConfig::new("").validate(),
            Err(ValidationError::MissingRequired("redis.url"))
        );
    }

    #[test]
    fn foreign_scheme_is_rejected() {
        assert!(matches!(
            RedisConfig::new("http://localhost:6379").validate(),
            Err(ValidationError::InvalidRedisUrl(_))
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = RedisConfig {
            connect_timeout_ms: 0,
            ..RedisConfig::new("redis://localhost")
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidTimeout("redis.connect_timeout_ms"))
        );
    }
}
