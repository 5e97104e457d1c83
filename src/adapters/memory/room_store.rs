//! In-memory room store for tests, development and single-node deployments.
//!
//! All rooms live in one `RwLock<HashMap>`. Every mutation takes the write
//! lock for its whole duration, so each operation is atomic with respect to
//! every other one.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DataId, RoomId, UserId};
use crate::domain::room::{DataAction, Room, RoomSnapshot, RoomStoreError, User};
use crate::domain::value::{Value, ValueKind};
use crate::ports::RoomStore;

/// State of one room.
#[derive(Debug, Clone)]
struct RoomRecord {
    room: Room,
    /// Members in join order.
    users: Vec<User>,
    values: HashMap<String, Value>,
}

impl RoomRecord {
    fn new(room: Room) -> Self {
        Self {
            room,
            users: Vec::new(),
            values: HashMap::new(),
        }
    }

    fn apply(
        &mut self,
        data_id: &DataId,
        action: DataAction,
        value: Option<Value>,
    ) -> Result<(), RoomStoreError> {
        let room_id = self.room.id;
        let not_found = || RoomStoreError::DataNotFound {
            room_id,
            data_id: data_id.clone(),
        };
        let mismatch = |expected: &'static str, found: ValueKind| RoomStoreError::TypeMismatch {
            data_id: data_id.clone(),
            expected,
            found,
        };
        let key = data_id.as_str();

        match action {
            DataAction::Set => {
                self.values
                    .insert(key.to_string(), value.unwrap_or_default());
            }
            DataAction::Delete => {
                self.values.remove(key).ok_or_else(not_found)?;
            }
            DataAction::Append => {
                let item = value.unwrap_or_default();
                match self.values.get_mut(key) {
                    None => {
                        self.values.insert(key.to_string(), Value::List(vec![item]));
                    }
                    Some(Value::List(items)) => items.push(item),
                    Some(other) => return Err(mismatch("list", other.kind())),
                }
            }
            DataAction::Remove => {
                let target = value.unwrap_or_default();
                match self.values.get_mut(key) {
                    None => return Err(not_found()),
                    Some(Value::List(items)) => {
                        let position = items
                            .iter()
                            .position(|item| item == &target)
                            .ok_or_else(not_found)?;
                        items.remove(position);
                    }
                    Some(Value::Map(entries)) => {
                        let Value::Str(map_key) = &target else {
                            return Err(mismatch("string key", target.kind()));
                        };
                        entries.remove(map_key).ok_or_else(not_found)?;
                    }
                    Some(other) => return Err(mismatch("list or map", other.kind())),
                }
            }
        }
        Ok(())
    }
}

/// In-memory [`RoomStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoomStore {
    rooms: Arc<RwLock<HashMap<RoomId, RoomRecord>>>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rooms currently stored.
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn create_room(&self, room: Room) -> Result<Room, RoomStoreError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&room.id) {
            return Err(RoomStoreError::AlreadyExists(room.id));
        }
        rooms.insert(room.id, RoomRecord::new(room.clone()));
        Ok(room)
    }

    async fn delete_room(&self, room_id: &RoomId, caller: &UserId) -> Result<(), RoomStoreError> {
        let mut rooms = self.rooms.write().await;
        let record = rooms
            .get(room_id)
            .ok_or(RoomStoreError::RoomNotFound(*room_id))?;
        if !record.room.is_owned_by(caller) {
            return Err(RoomStoreError::NotOwner {
                room_id: *room_id,
                user_id: caller.clone(),
            });
        }
        rooms.remove(room_id);
        Ok(())
    }

    async fn join_room(&self, room_id: &RoomId, user: User) -> Result<(), RoomStoreError> {
        let mut rooms = self.rooms.write().await;
        let record = rooms
            .get_mut(room_id)
            .ok_or(RoomStoreError::RoomNotFound(*room_id))?;
        match record.users.iter_mut().find(|member| member.id == user.id) {
            Some(member) => *member = user,
            None => record.users.push(user),
        }
        Ok(())
    }

    async fn leave_room(
        &self,
        room_id: &RoomId,
        caller: &UserId,
        kicked: &UserId,
    ) -> Result<(), RoomStoreError> {
        let mut rooms = self.rooms.write().await;
        let record = rooms
            .get_mut(room_id)
            .ok_or(RoomStoreError::RoomNotFound(*room_id))?;
        if caller != kicked && !record.room.is_owned_by(caller) {
            return Err(RoomStoreError::NotOwner {
                room_id: *room_id,
                user_id: caller.clone(),
            });
        }
        let position = record
            .users
            .iter()
            .position(|member| &member.id == kicked)
            .ok_or_else(|| RoomStoreError::MemberNotFound {
                room_id: *room_id,
                user_id: kicked.clone(),
            })?;
        record.users.remove(position);
        Ok(())
    }

    async fn is_owner(&self, room_id: &RoomId, user_id: &UserId) -> Result<bool, RoomStoreError> {
        let rooms = self.rooms.read().await;
        rooms
            .get(room_id)
            .map(|record| record.room.is_owned_by(user_id))
            .ok_or(RoomStoreError::RoomNotFound(*room_id))
    }

    async fn snapshot(&self, room_id: &RoomId) -> Result<RoomSnapshot, RoomStoreError> {
        let rooms = self.rooms.read().await;
        let record = rooms
            .get(room_id)
            .ok_or(RoomStoreError::RoomNotFound(*room_id))?;
        Ok(RoomSnapshot {
            room: record.room.clone(),
            users: record.users.clone(),
            values: record.values.clone(),
        })
    }

    async fn affect_data(
        &self,
        room_id: &RoomId,
        data_id: &DataId,
        action: DataAction,
        value: Option<Value>,
    ) -> Result<(), RoomStoreError> {
        let mut rooms = self.rooms.write().await;
        let record = rooms
            .get_mut(room_id)
            .ok_or(RoomStoreError::RoomNotFound(*room_id))?;
        record.apply(data_id, action, value)
    }
}
