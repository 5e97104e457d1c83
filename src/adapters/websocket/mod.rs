//! WebSocket transport for the room command stream.
//!
//! # Components
//!
//! - [`messages`] - JSON wire protocol and value codec
//! - [`channel`] - Socket halves as dispatcher channel ports
//! - [`handler`] - Axum routes

pub mod channel;
pub mod handler;
pub mod messages;

pub use channel::{WebSocketSink, WebSocketSource};
pub use handler::{room_router, single_command, stream_handler, RoomServiceState};
pub use messages::{
    decode_command, encode_event, WireCommand, WireCommandPayload, WireDataAction, WireEvent,
    WireEventPayload, WireUser, WireValue,
};
