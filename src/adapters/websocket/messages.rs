//! Wire protocol for the room stream.
//!
//! Every WebSocket text frame carries one JSON object. Field names are
//! camelCase; enum cases are externally tagged:
//!
//! ```json
//! {"userId": "u1", "roomId": "…", "commandId": "c1",
//!  "payload": {"affectData": {"dataId": "log", "action": "append",
//!                             "value": {"int": 3}}}}
//! ```
//!
//! Values mirror the domain [`Value`] one case per tag; `"empty"` stands
//! for the empty value. Unknown tags are decoding errors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::room::{
    Command, CommandPayload, DataAction, Event, EventPayload, User, UserFields,
};
use crate::domain::value::Value;
use crate::ports::ChannelError;

// ============================================
// Values
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireValue {
    Empty,
    Int(i64),
    Str(String),
    Bool(bool),
    Float(f64),
    Bytes(Vec<u8>),
    List(Vec<WireValue>),
    Map(HashMap<String, WireValue>),
}

impl From<&Value> for WireValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Empty => WireValue::Empty,
            Value::Int(n) => WireValue::Int(*n),
            Value::Str(s) => WireValue::Str(s.clone()),
            Value::Bool(b) => WireValue::Bool(*b),
            Value::Float(f) => WireValue::Float(*f),
            Value::Bytes(bytes) => WireValue::Bytes(bytes.clone()),
            Value::List(items) => WireValue::List(items.iter().map(WireValue::from).collect()),
            Value::Map(entries) => WireValue::Map(
                entries
                    .iter()
                    .map(|(key, item)| (key.clone(), WireValue::from(item)))
                    .collect(),
            ),
        }
    }
}

impl From<WireValue> for Value {
    fn from(value: WireValue) -> Self {
        match value {
            WireValue::Empty => Value::Empty,
            WireValue::Int(n) => Value::Int(n),
            WireValue::Str(s) => Value::Str(s),
            WireValue::Bool(b) => Value::Bool(b),
            WireValue::Float(f) => Value::Float(f),
            WireValue::Bytes(bytes) => Value::Bytes(bytes),
            WireValue::List(items) => Value::List(items.into_iter().map(Value::from).collect()),
            WireValue::Map(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, Value::from(item)))
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireDataAction {
    Set,
    Delete,
    Append,
    Remove,
}

impl From<WireDataAction> for DataAction {
    fn from(action: WireDataAction) -> Self {
        match action {
            WireDataAction::Set => DataAction::Set,
            WireDataAction::Delete => DataAction::Delete,
            WireDataAction::Append => DataAction::Append,
            WireDataAction::Remove => DataAction::Remove,
        }
    }
}

impl From<DataAction> for WireDataAction {
    fn from(action: DataAction) -> Self {
        match action {
            DataAction::Set => WireDataAction::Set,
            DataAction::Delete => WireDataAction::Delete,
            DataAction::Append => WireDataAction::Append,
            DataAction::Remove => WireDataAction::Remove,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl From<&User> for WireUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.to_string(),
            metadata: user.metadata.clone(),
        }
    }
}

// ============================================
// Client → Server
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCommand {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
    pub payload: WireCommandPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireCommandPayload {
    CreateRoom {
        #[serde(default)]
        options: HashMap<String, String>,
    },
    DeleteRoom {},
    JoinRoom {
        user: WireUser,
    },
    #[serde(rename_all = "camelCase")]
    LeaveRoom {
        kicked_user_id: String,
    },
    #[serde(rename_all = "camelCase")]
    AffectData {
        data_id: String,
        action: WireDataAction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<WireValue>,
    },
    RefreshRoom {},
}

impl From<WireCommand> for Command {
    fn from(wire: WireCommand) -> Self {
        let payload = match wire.payload {
            WireCommandPayload::CreateRoom { options } => CommandPayload::CreateRoom { options },
            WireCommandPayload::DeleteRoom {} => CommandPayload::DeleteRoom,
            WireCommandPayload::JoinRoom { user } => CommandPayload::JoinRoom {
                user: UserFields {
                    id: user.id,
                    name: user.name,
                    metadata: user.metadata,
                },
            },
            WireCommandPayload::LeaveRoom { kicked_user_id } => {
                CommandPayload::LeaveRoom { kicked_user_id }
            }
            WireCommandPayload::AffectData {
                data_id,
                action,
                value,
            } => CommandPayload::AffectData {
                data_id,
                action: action.into(),
                value: value.map(Value::from),
            },
            WireCommandPayload::RefreshRoom {} => CommandPayload::RefreshRoom,
        };

        Command {
            user_id: wire.user_id,
            room_id: wire.room_id,
            command_id: wire.command_id,
            payload,
        }
    }
}

/// Envelope fields recoverable from a frame that failed full decoding.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialEnvelope {
    user_id: Option<String>,
    room_id: Option<String>,
}

/// Decodes one text frame into a command.
///
/// On failure the error keeps whatever `userId`/`roomId` could be read, so
/// the error event can still be addressed.
pub fn decode_command(text: &str) -> Result<Command, ChannelError> {
    match serde_json::from_str::<WireCommand>(text) {
        Ok(wire) => Ok(wire.into()),
        Err(err) => {
            let envelope = serde_json::from_str::<PartialEnvelope>(text).unwrap_or_default();
            Err(ChannelError::Malformed {
                user_id: envelope.user_id,
                room_id: envelope.room_id,
                reason: err.to_string(),
            })
        }
    }
}

// ============================================
// Server → Client
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEvent {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub room_id: String,
    pub user_id: String,
    pub payload: WireEventPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WireEventPayload {
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        room_id: String,
        options: HashMap<String, String>,
    },
    #[serde(rename_all = "camelCase")]
    RoomDeleted { room_id: String },
    #[serde(rename_all = "camelCase")]
    JoinedRoom { room_id: String, user: WireUser },
    #[serde(rename_all = "camelCase")]
    LeftRoom {
        room_id: String,
        kicked_user_id: String,
    },
    #[serde(rename_all = "camelCase")]
    DataEdited {
        room_id: String,
        data_id: String,
        action: WireDataAction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<WireValue>,
    },
    #[serde(rename_all = "camelCase")]
    FullRoom {
        room_id: String,
        options: HashMap<String, String>,
        users: Vec<WireUser>,
        values: HashMap<String, WireValue>,
    },
    ErrorMessage { text: String },
}

impl From<&Event> for WireEvent {
    fn from(event: &Event) -> Self {
        let payload = match &event.payload {
            EventPayload::RoomCreated(created) => WireEventPayload::RoomCreated {
                room_id: created.room_id.to_string(),
                options: created.options.clone(),
            },
            EventPayload::RoomDeleted(deleted) => WireEventPayload::RoomDeleted {
                room_id: deleted.room_id.to_string(),
            },
            EventPayload::JoinedRoom(joined) => WireEventPayload::JoinedRoom {
                room_id: joined.room_id.to_string(),
                user: WireUser::from(&joined.user),
            },
            EventPayload::LeftRoom(left) => WireEventPayload::LeftRoom {
                room_id: left.room_id.to_string(),
                kicked_user_id: left.kicked_user_id.to_string(),
            },
            EventPayload::DataEdited(edited) => WireEventPayload::DataEdited {
                room_id: edited.room_id.to_string(),
                data_id: edited.data_id.to_string(),
                action: edited.action.into(),
                value: edited.value.as_ref().map(WireValue::from),
            },
            EventPayload::FullRoom(snapshot) => WireEventPayload::FullRoom {
                room_id: snapshot.room.id.to_string(),
                options: snapshot.room.options.clone(),
                users: snapshot.users.iter().map(WireUser::from).collect(),
                values: snapshot
                    .values
                    .iter()
                    .map(|(key, value)| (key.clone(), WireValue::from(value)))
                    .collect(),
            },
            EventPayload::ErrorMessage { text } => WireEventPayload::ErrorMessage { text: text.clone() },
        };

        Self {
            timestamp: event.timestamp.as_unix_secs(),
            room_id: event.room_id.clone(),
            user_id: event.user_id.clone(),
            payload,
        }
    }
}

/// Encodes an event as one text frame.
pub fn encode_event(event: &Event) -> Result<String, ChannelError> {
    serde_json::to_string(&WireEvent::from(event)).map_err(ChannelError::transport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::RoomId;
    use crate::domain::room::{DataEdited, RoomSnapshot};
    use crate::domain::value::arb_value;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        #[test]
        fn value_survives_json_round_trip(value in arb_value()) {
            let json = serde_json::to_string(&WireValue::from(&value)).unwrap();
            let decoded: WireValue = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(Value::from(decoded), value);
        }
    }

    #[test]
    fn nested_value_uses_tagged_json() {
        let value = Value::list(&[Value::int(1), Value::map(&HashMap::from([(
            "ok".to_string(),
            Value::bool(true),
        )]))]);

        let json = serde_json::to_value(WireValue::from(&value)).unwrap();

        assert_eq!(json, json!({"list": [{"int": 1}, {"map": {"ok": {"bool": true}}}]}));
    }

    #[test]
    fn empty_value_is_a_bare_tag() {
        assert_eq!(serde_json::to_value(WireValue::Empty).unwrap(), json!("empty"));
    }

    #[test]
    fn unknown_value_tag_is_rejected() {
        assert!(serde_json::from_value::<WireValue>(json!({"decimal": "1.5"})).is_err());
    }

    #[test]
    fn decodes_affect_data_command() {
        let text = r#"{
            "userId": "u1",
            "roomId": "550e8400-e29b-41d4-a716-446655440000",
            "commandId": "c1",
            "payload": {"affectData": {"dataId": "log", "action": "append", "value": {"str": "hi"}}}
        }"#;

        let command = decode_command(text).unwrap();

        assert_eq!(command.command_id.as_deref(), Some("c1"));
        assert_eq!(
            command.payload,
            CommandPayload::AffectData {
                data_id: "log".to_string(),
                action: DataAction::Append,
                value: Some(Value::str("hi")),
            }
        );
    }

    #[test]
    fn decodes_unit_commands() {
        let command = decode_command(r#"{"userId": "u1", "payload": {"refreshRoom": {}}}"#).unwrap();
        assert_eq!(command.payload, CommandPayload::RefreshRoom);
        assert_eq!(command.room_id, None);
    }

    #[test]
    fn malformed_frame_keeps_envelope() {
        let text = r#"{"userId": "u1", "roomId": "r1", "payload": {"dance": {}}}"#;

        match decode_command(text) {
            Err(ChannelError::Malformed { user_id, room_id, .. }) => {
                assert_eq!(user_id.as_deref(), Some("u1"));
                assert_eq!(room_id.as_deref(), Some("r1"));
            }
            other => panic!("expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn garbage_frame_is_malformed_without_envelope() {
        assert!(matches!(
            decode_command("not json"),
            Err(ChannelError::Malformed { user_id: None, room_id: None, .. })
        ));
    }

    #[test]
    fn encodes_data_edited_event() {
        let room_id = RoomId::new();
        let command = Command::new("u1", CommandPayload::RefreshRoom).in_room(room_id.to_string());
        let event = Event::reply_to(
            &command,
            EventPayload::DataEdited(DataEdited {
                room_id,
                data_id: crate::domain::foundation::DataId::new("log").unwrap(),
                action: DataAction::Append,
                value: Some(Value::int(2)),
            }),
        );

        let json: serde_json::Value = serde_json::from_str(&encode_event(&event).unwrap()).unwrap();

        assert_eq!(json["userId"], "u1");
        assert_eq!(json["roomId"], room_id.to_string());
        assert_eq!(json["timestamp"], event.timestamp.as_unix_secs());
        assert_eq!(
            json["payload"],
            json!({"dataEdited": {
                "roomId": room_id.to_string(),
                "dataId": "log",
                "action": "append",
                "value": {"int": 2}
            }})
        );
    }

    #[test]
    fn full_room_lists_members_and_values() {
        let room = crate::domain::room::Room::new(
            crate::domain::foundation::UserId::new("u1").unwrap(),
            HashMap::from([("k".to_string(), "v".to_string())]),
        );
        let room_id = room.id;
        let snapshot = RoomSnapshot {
            room,
            users: vec![],
            values: HashMap::from([("n".to_string(), Value::int(1))]),
        };
        let command = Command::new("u1", CommandPayload::RefreshRoom).in_room(room_id.to_string());

        let wire = WireEvent::from(&Event::reply_to(&command, EventPayload::FullRoom(snapshot)));

        assert_eq!(
            wire.payload,
            WireEventPayload::FullRoom {
                room_id: room_id.to_string(),
                options: HashMap::from([("k".to_string(), "v".to_string())]),
                users: vec![],
                values: HashMap::from([("n".to_string(), WireValue::Int(1))]),
            }
        );
    }
}
