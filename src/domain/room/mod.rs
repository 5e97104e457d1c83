//! Room module - rooms, members, data actions and the command/event
//! vocabulary exchanged with clients.

mod command;
mod errors;
mod event;
mod model;

pub use command::{Command, CommandPayload, UserFields};
pub use errors::{CacheError, RoomError, RoomStoreError};
pub use event::{
    DataEdited, Event, EventPayload, JoinedRoom, LeftRoom, RoomCreated, RoomDeleted,
};
pub use model::{DataAction, Room, RoomSnapshot, User};
