//! Service configuration, read from the environment.
//!
//! Every setting has a default, so an empty environment yields a runnable
//! single-node service. Variables use the `ROOM_SERVICE` prefix and `__`
//! between section and key:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `ROOM_SERVICE__SERVER__PORT` | `server.port` |
//! | `ROOM_SERVICE__SERVER__LOG_FORMAT` | `server.log_format` (`pretty`, `json`) |
//! | `ROOM_SERVICE__RETRY__ATTEMPTS` | `retry.attempts` |
//! | `ROOM_SERVICE__DISPATCH__MAX_IN_FLIGHT` | `dispatch.max_in_flight` |
//! | `ROOM_SERVICE__REDIS__URL` | `redis.url` (enables the shared cache) |
//!
//! A `.env` file in the working directory is read first, if present.

mod dispatch;
mod error;
mod redis;
mod retry;
mod server;

pub use self::redis::RedisConfig;
pub use dispatch::DispatchConfig;
pub use error::{ConfigError, ValidationError};
pub use retry::RetryConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

const ENV_PREFIX: &str = "ROOM_SERVICE";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Applied to every store, cache and channel call
    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Shared command cache; `None` means in-memory deduplication
    #[serde(default)]
    pub redis: Option<RedisConfig>,
}

impl AppConfig {
    /// Reads `.env` and the process environment.
    ///
    /// Only fails when a variable cannot be parsed into its field's type;
    /// range checks are left to [`validate`](Self::validate).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.retry.validate()?;
        self.dispatch.validate()?;
        self.redis.as_ref().map_or(Ok(()), RedisConfig::validate)
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
