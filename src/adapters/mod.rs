//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `memory` - In-memory room store, command cache and channel
//! - `redis` - Redis command cache for multi-node deduplication
//! - `websocket` - Axum WebSocket transport and JSON wire protocol

pub mod memory;
pub mod redis;
pub mod websocket;

pub use memory::{InMemoryChannel, InMemoryCommandCache, InMemoryRoomStore};
pub use self::redis::RedisCommandCache;
pub use websocket::{room_router, RoomServiceState};
