//! Inbound commands, as decoded from the wire but not yet validated.
//!
//! Field values are kept raw (plain strings) on purpose: validation has a
//! fixed order and its failures must still be answered with an event that
//! echoes whatever room and user ids the client sent.

use std::collections::HashMap;

use crate::domain::value::Value;

use super::DataAction;

/// A single client-issued request.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Caller; must be non-empty for every command.
    pub user_id: String,
    /// Target room; ignored for `CreateRoom`, required otherwise.
    pub room_id: Option<String>,
    /// Optional client-supplied id for deduplication.
    pub command_id: Option<String>,
    pub payload: CommandPayload,
}

impl Command {
    pub fn new(user_id: impl Into<String>, payload: CommandPayload) -> Self {
        Self {
            user_id: user_id.into(),
            room_id: None,
            command_id: None,
            payload,
        }
    }

    /// Builder: target a room.
    pub fn in_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    /// Builder: attach a deduplication id.
    pub fn with_command_id(mut self, command_id: impl Into<String>) -> Self {
        self.command_id = Some(command_id.into());
        self
    }

    /// Short name of the payload variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self.payload {
            CommandPayload::CreateRoom { .. } => "create_room",
            CommandPayload::DeleteRoom => "delete_room",
            CommandPayload::JoinRoom { .. } => "join_room",
            CommandPayload::LeaveRoom { .. } => "leave_room",
            CommandPayload::AffectData { .. } => "affect_data",
            CommandPayload::RefreshRoom => "refresh_room",
        }
    }
}

/// Exactly one of the supported operations.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandPayload {
    CreateRoom {
        options: HashMap<String, String>,
    },
    DeleteRoom,
    JoinRoom {
        user: UserFields,
    },
    LeaveRoom {
        kicked_user_id: String,
    },
    AffectData {
        data_id: String,
        action: DataAction,
        value: Option<Value>,
    },
    RefreshRoom,
}

/// Raw description of a joining user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFields {
    pub id: String,
    pub name: String,
    pub metadata: HashMap<String, String>,
}

impl UserFields {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            metadata: HashMap::new(),
        }
    }
}
