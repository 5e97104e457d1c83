//! Command dispatch configuration

use serde::Deserialize;
use std::time::Duration;

use tokio::sync::Semaphore;

use super::error::ValidationError;

/// Dispatch configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DispatchConfig {
    /// Maximum concurrently executing commands per connection
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// How long a command id is remembered for deduplication, in milliseconds
    #[serde(default = "default_command_ttl_ms")]
    pub command_ttl_ms: u64,

    /// Namespace prepended to command ids in the cache
    #[serde(default = "default_command_key_prefix")]
    pub command_key_prefix: String,
}

impl DispatchConfig {
    pub fn command_ttl(&self) -> Duration {
        Duration::from_millis(self.command_ttl_ms)
    }

    /// Validate dispatch configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_in_flight == 0 || self.max_in_flight > Semaphore::MAX_PERMITS {
            return Err(ValidationError::InvalidMaxInFlight {
                max: Semaphore::MAX_PERMITS,
            });
        }
        if self.command_ttl_ms == 0 {
            return Err(ValidationError::InvalidTimeout("dispatch.command_ttl_ms"));
        }
        Ok(())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
            command_ttl_ms: default_command_ttl_ms(),
            command_key_prefix: default_command_key_prefix(),
        }
    }
}

fn default_max_in_flight() -> usize {
    64
}

fn default_command_ttl_ms() -> u64 {
    60_000
}

fn default_command_key_prefix() -> String {
    "command_".to_string()
}
