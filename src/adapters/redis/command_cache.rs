//! Redis-backed command cache for multi-node deployments.
//!
//! Each command id is stored as `{prefix}{command_id}` with a millisecond
//! TTL and the reserving owner as its value. Reservation runs as one Lua
//! script, so concurrent nodes racing on the same id see exactly one
//! winner and an owner retrying after a lost reply still wins.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Script};

use crate::domain::foundation::CommandId;
use crate::domain::room::CacheError;
use crate::ports::CommandCache;

/// `SET NX PX` that also succeeds when the key already holds ARGV[1].
const RESERVE_SCRIPT: &str = r#"
local current = redis.call('GET', KEYS[1])
if not current then
    redis.call('SET', KEYS[1], ARGV[1], 'PX', ARGV[2])
    return 1
end
if current == ARGV[1] then
    return 1
end
return 0
"#;

/// Redis [`CommandCache`].
#[derive(Clone)]
pub struct RedisCommandCache {
    conn: MultiplexedConnection,
    prefix: String,
    ttl: Duration,
}

impl RedisCommandCache {
    pub fn new(conn: MultiplexedConnection, prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
            ttl,
        }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(
        url: &str,
        prefix: impl Into<String>,
        ttl: Duration,
    ) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(unavailable)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(unavailable)?;
        Ok(Self::new(conn, prefix, ttl))
    }

    fn key(&self, id: &CommandId) -> String {
        command_key(&self.prefix, id)
    }

    fn ttl_ms(&self) -> u64 {
        (self.ttl.as_millis() as u64).max(1)
    }
}

fn command_key(prefix: &str, id: &CommandId) -> String {
    format!("{}{}", prefix, id)
}

fn unavailable(err: redis::RedisError) -> CacheError {
    CacheError::new(err.to_string())
}

#[async_trait]
impl CommandCache for RedisCommandCache {
    async fn exists(&self, id: &CommandId) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        conn.exists(self.key(id)).await.map_err(unavailable)
    }

    async fn save(&self, id: &CommandId, owner: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(self.key(id))
            .arg(owner)
            .arg("PX")
            .arg(self.ttl_ms())
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(unavailable)
    }

    async fn save_if_absent(&self, id: &CommandId, owner: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        let reserved: i64 = Script::new(RESERVE_SCRIPT)
            .key(self.key(id))
            .arg(owner)
            .arg(self.ttl_ms())
            .invoke_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(reserved == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_prefix_then_id() {
        let id = CommandId::new("abc-123").unwrap();
        assert_eq!(command_key("command_", &id), "command_abc-123");
    }

    // Round trips against a live server need a running Redis instance:
    //
    // #[tokio::test]
    // #[ignore]
    // async fn reserves_once() {
    //     let cache = RedisCommandCache::connect("redis://127.0.0.1/", "test_", Duration::from_secs(5))
    //         .await
    //         .unwrap();
    //     ...
    // }
}
