//! Test double for the room store shared by handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::adapters::memory::InMemoryRoomStore;
use crate::domain::foundation::{DataId, RoomId, UserId};
use crate::domain::room::{DataAction, Room, RoomSnapshot, RoomStoreError, User};
use crate::domain::value::Value;
use crate::ports::RoomStore;

const MUTATIONS: [&str; 5] = [
    "create_room",
    "delete_room",
    "join_room",
    "leave_room",
    "affect_data",
];

/// In-memory store with a call log and transient failure injection.
pub(crate) struct MockRoomStore {
    inner: InMemoryRoomStore,
    calls: Mutex<Vec<&'static str>>,
    transient_failures: AtomicU32,
}

impl MockRoomStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryRoomStore::new(),
            calls: Mutex::new(Vec::new()),
            transient_failures: AtomicU32::new(0),
        }
    }

    /// Makes the next `count` calls fail with `Unavailable`.
    pub fn fail_next(&self, count: u32) {
        self.transient_failures.store(count, Ordering::SeqCst);
    }

    /// Creates a room directly, bypassing the call log.
    pub async fn seed_room(&self, owner: &str) -> RoomId {
        let room = Room::new(UserId::new(owner).unwrap(), HashMap::new());
        self.inner.create_room(room).await.unwrap().id
    }

    pub fn inner(&self) -> &InMemoryRoomStore {
        &self.inner
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|name| MUTATIONS.contains(name))
            .count()
    }

    fn enter(&self, name: &'static str) -> Result<(), RoomStoreError> {
        self.calls.lock().unwrap().push(name);
        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(RoomStoreError::unavailable("injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl RoomStore for MockRoomStore {
    async fn create_room(&self, room: Room) -> Result<Room, RoomStoreError> {
        self.enter("create_room")?;
        self.inner.create_room(room).await
    }

    async fn delete_room(&self, room_id: &RoomId, caller: &UserId) -> Result<(), RoomStoreError> {
        self.enter("delete_room")?;
        self.inner.delete_room(room_id, caller).await
    }

    async fn join_room(&self, room_id: &RoomId, user: User) -> Result<(), RoomStoreError> {
        self.enter("join_room")?;
        self.inner.join_room(room_id, user).await
    }

    async fn leave_room(
        &self,
        room_id: &RoomId,
        caller: &UserId,
        kicked: &UserId,
    ) -> Result<(), RoomStoreError> {
        self.enter("leave_room")?;
        self.inner.leave_room(room_id, caller, kicked).await
    }

    async fn is_owner(&self, room_id: &RoomId, user_id: &UserId) -> Result<bool, RoomStoreError> {
        self.enter("is_owner")?;
        self.inner.is_owner(room_id, user_id).await
    }

    async fn snapshot(&self, room_id: &RoomId) -> Result<RoomSnapshot, RoomStoreError> {
        self.enter("snapshot")?;
        self.inner.snapshot(room_id).await
    }

    async fn affect_data(
        &self,
        room_id: &RoomId,
        data_id: &DataId,
        action: DataAction,
        value: Option<Value>,
    ) -> Result<(), RoomStoreError> {
        self.enter("affect_data")?;
        self.inner.affect_data(room_id, data_id, action, value).await
    }
}
