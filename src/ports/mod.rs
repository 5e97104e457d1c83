//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `RoomStore` - Rooms, membership and room data
//! - `CommandCache` - Command-id deduplication with TTL
//!
//! ## Channel Ports
//!
//! - `CommandSource` - Inbound half of a client connection
//! - `EventSink` - Outbound half of a client connection

mod command_cache;
mod event_channel;
mod room_store;

pub use command_cache::CommandCache;
pub use event_channel::{ChannelError, CommandSource, EventSink};
pub use room_store::RoomStore;
