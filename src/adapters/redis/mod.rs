//! Redis adapters.

mod command_cache;

pub use command_cache::RedisCommandCache;
