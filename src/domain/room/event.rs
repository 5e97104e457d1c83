//! Outbound events describing the effect of a command.

use std::collections::HashMap;

use crate::domain::foundation::{DataId, RoomId, Timestamp, UserId};
use crate::domain::value::Value;

use super::{Command, DataAction, RoomSnapshot, User};

/// A single server-issued response, success or error.
///
/// `room_id` and `user_id` echo the triggering command verbatim, except
/// after a successful `CreateRoom` where `room_id` is the new room.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub timestamp: Timestamp,
    pub room_id: String,
    pub user_id: String,
    pub payload: EventPayload,
}

impl Event {
    /// Creates an event answering `command`.
    pub fn reply_to(command: &Command, payload: EventPayload) -> Self {
        Self {
            timestamp: Timestamp::now(),
            room_id: command.room_id.clone().unwrap_or_default(),
            user_id: command.user_id.clone(),
            payload,
        }
    }

    /// Creates an error event answering `command`.
    pub fn error_for(command: &Command, text: impl Into<String>) -> Self {
        Self::reply_to(command, EventPayload::error(text))
    }

    /// Copies the envelope of `self` onto a new error payload.
    ///
    /// Used when delivering `self` failed and the client should at least
    /// learn why.
    pub fn to_error(&self, text: impl Into<String>) -> Self {
        Self {
            timestamp: self.timestamp,
            room_id: self.room_id.clone(),
            user_id: self.user_id.clone(),
            payload: EventPayload::error(text),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, EventPayload::ErrorMessage { .. })
    }
}

/// Exactly one outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    RoomCreated(RoomCreated),
    RoomDeleted(RoomDeleted),
    JoinedRoom(JoinedRoom),
    LeftRoom(LeftRoom),
    DataEdited(DataEdited),
    FullRoom(RoomSnapshot),
    ErrorMessage { text: String },
}

impl EventPayload {
    pub fn error(text: impl Into<String>) -> Self {
        EventPayload::ErrorMessage { text: text.into() }
    }

    /// Short name of the payload variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            EventPayload::RoomCreated(_) => "room_created",
            EventPayload::RoomDeleted(_) => "room_deleted",
            EventPayload::JoinedRoom(_) => "joined_room",
            EventPayload::LeftRoom(_) => "left_room",
            EventPayload::DataEdited(_) => "data_edited",
            EventPayload::FullRoom(_) => "full_room",
            EventPayload::ErrorMessage { .. } => "error_message",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomCreated {
    pub room_id: RoomId,
    pub options: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomDeleted {
    pub room_id: RoomId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRoom {
    pub room_id: RoomId,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeftRoom {
    pub room_id: RoomId,
    pub kicked_user_id: UserId,
}

/// Confirmation of a data change; `value` echoes what was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DataEdited {
    pub room_id: RoomId,
    pub data_id: DataId,
    pub action: DataAction,
    pub value: Option<Value>,
}
