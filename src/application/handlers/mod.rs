//! Application handlers.
//!
//! Command handlers that orchestrate room operations against the store.

pub mod room;

pub use room::{
    AffectDataCommand, AffectDataHandler, CreateRoomCommand, CreateRoomHandler,
    DeleteRoomCommand, DeleteRoomHandler, JoinRoomCommand, JoinRoomHandler, LeaveRoomCommand,
    LeaveRoomHandler, RefreshRoomCommand, RefreshRoomHandler, RoomHandlers,
};
