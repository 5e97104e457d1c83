//! Validation of raw commands into typed room operations.
//!
//! Checks run in a fixed order and stop at the first failure:
//! caller id, then room id (skipped for `CreateRoom`), then payload fields.
//! No store is touched here.

use crate::domain::foundation::{DataId, RoomId, UserId, UserName, ValidationError};
use crate::domain::room::{Command, CommandPayload, User};

use super::handlers::{
    AffectDataCommand, CreateRoomCommand, DeleteRoomCommand, JoinRoomCommand, LeaveRoomCommand,
    RefreshRoomCommand,
};

/// A validated command, ready for its handler.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomOperation {
    CreateRoom(CreateRoomCommand),
    DeleteRoom(DeleteRoomCommand),
    JoinRoom(JoinRoomCommand),
    LeaveRoom(LeaveRoomCommand),
    AffectData(AffectDataCommand),
    RefreshRoom(RefreshRoomCommand),
}

impl RoomOperation {
    pub fn from_command(command: &Command) -> Result<Self, ValidationError> {
        let user_id = UserId::new(command.user_id.as_str())?;

        let operation = match &command.payload {
            CommandPayload::CreateRoom { options } => {
                RoomOperation::CreateRoom(CreateRoomCommand {
                    user_id,
                    options: options.clone(),
                })
            }
            CommandPayload::DeleteRoom => RoomOperation::DeleteRoom(DeleteRoomCommand {
                room_id: room_id(command)?,
                user_id,
            }),
            CommandPayload::JoinRoom { user } => {
                let room_id = room_id(command)?;
                let member = User::new(
                    UserId::new(user.id.as_str())?,
                    UserName::new(user.name.as_str())?,
                    user.metadata.clone(),
                );
                RoomOperation::JoinRoom(JoinRoomCommand {
                    room_id,
                    user_id,
                    user: member,
                })
            }
            CommandPayload::LeaveRoom { kicked_user_id } => {
                let room_id = room_id(command)?;
                let kicked_user_id = UserId::new(kicked_user_id.as_str())
                    .map_err(|_| ValidationError::empty_field("kicked_user_id"))?;
                RoomOperation::LeaveRoom(LeaveRoomCommand {
                    room_id,
                    user_id,
                    kicked_user_id,
                })
            }
            CommandPayload::AffectData {
                data_id,
                action,
                value,
            } => {
                let room_id = room_id(command)?;
                let data_id = DataId::new(data_id.as_str())?;
                if action.requires_value() && value.is_none() {
                    return Err(ValidationError::missing_field("value"));
                }
                RoomOperation::AffectData(AffectDataCommand {
                    room_id,
                    user_id,
                    data_id,
                    action: *action,
                    value: value.clone(),
                })
            }
            CommandPayload::RefreshRoom => RoomOperation::RefreshRoom(RefreshRoomCommand {
                room_id: room_id(command)?,
                user_id,
            }),
        };

        Ok(operation)
    }
}

fn room_id(command: &Command) -> Result<RoomId, ValidationError> {
    match command.room_id.as_deref() {
        None | Some("") => Err(ValidationError::missing_field("room_id")),
        Some(raw) => RoomId::parse(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::room::{DataAction, UserFields};
    use crate::domain::value::Value;
    use std::collections::HashMap;

    const ROOM: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn create_room_ignores_room_id() {
        let cmd = Command::new(
            "u1",
            CommandPayload::CreateRoom {
                options: HashMap::from([("k".to_string(), "v".to_string())]),
            },
        )
        .in_room("not-a-uuid");

        let op = RoomOperation::from_command(&cmd).unwrap();

        assert!(matches!(op, RoomOperation::CreateRoom(c) if c.options["k"] == "v"));
    }

    #[test]
    fn user_id_is_checked_before_room_id() {
        let cmd = Command::new("", CommandPayload::DeleteRoom).in_room("not-a-uuid");

        assert_eq!(
            RoomOperation::from_command(&cmd),
            Err(ValidationError::empty_field("user_id"))
        );
    }

    #[test]
    fn room_id_is_checked_before_payload() {
        let cmd = Command::new(
            "u1",
            CommandPayload::JoinRoom {
                user: UserFields::new("", ""),
            },
        )
        .in_room("not-a-uuid");

        assert!(matches!(
            RoomOperation::from_command(&cmd),
            Err(ValidationError::InvalidFormat { field, .. }) if field == "room_id"
        ));
    }

    #[test]
    fn missing_room_id_is_rejected() {
        let cmd = Command::new("u1", CommandPayload::RefreshRoom);

        assert_eq!(
            RoomOperation::from_command(&cmd),
            Err(ValidationError::missing_field("room_id"))
        );
    }

    #[test]
    fn joined_user_needs_id_and_name() {
        let no_name = Command::new(
            "u1",
            CommandPayload::JoinRoom {
                user: UserFields::new("u2", ""),
            },
        )
        .in_room(ROOM);

        assert_eq!(
            RoomOperation::from_command(&no_name),
            Err(ValidationError::empty_field("user_name"))
        );
    }

    #[test]
    fn kicked_user_must_be_present() {
        let cmd = Command::new(
            "u1",
            CommandPayload::LeaveRoom {
                kicked_user_id: String::new(),
            },
        )
        .in_room(ROOM);

        assert_eq!(
            RoomOperation::from_command(&cmd),
            Err(ValidationError::empty_field("kicked_user_id"))
        );
    }

    #[test]
    fn affect_data_requires_value_except_for_delete() {
        let append = Command::new(
            "u1",
            CommandPayload::AffectData {
                data_id: "list".into(),
                action: DataAction::Append,
                value: None,
            },
        )
        .in_room(ROOM);
        let delete = Command::new(
            "u1",
            CommandPayload::AffectData {
                data_id: "list".into(),
                action: DataAction::Delete,
                value: None,
            },
        )
        .in_room(ROOM);

        assert_eq!(
            RoomOperation::from_command(&append),
            Err(ValidationError::missing_field("value"))
        );
        assert!(RoomOperation::from_command(&delete).is_ok());
    }

    #[test]
    fn affect_data_requires_data_id() {
        let cmd = Command::new(
            "u1",
            CommandPayload::AffectData {
                data_id: String::new(),
                action: DataAction::Set,
                value: Some(Value::int(1)),
            },
        )
        .in_room(ROOM);

        assert_eq!(
            RoomOperation::from_command(&cmd),
            Err(ValidationError::empty_field("data_id"))
        );
    }
}
