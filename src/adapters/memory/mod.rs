//! In-memory adapters for tests, development and single-node deployments.

mod channel;
mod command_cache;
mod room_store;

pub use channel::{ChannelClient, InMemoryChannel, InMemoryCommandSource, InMemoryEventSink};
pub use command_cache::InMemoryCommandCache;
pub use room_store::InMemoryRoomStore;
