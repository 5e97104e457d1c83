//! RoomStore port - Interface for durable room, membership and data state.
//!
//! The store is shared by every connection and every in-flight command, so
//! implementations must be safe for concurrent use. Handlers treat it as
//! opaque and add no locking of their own.

use async_trait::async_trait;

use crate::domain::foundation::{DataId, RoomId, UserId};
use crate::domain::room::{DataAction, Room, RoomSnapshot, RoomStoreError, User};
use crate::domain::value::Value;

/// Port for room persistence.
///
/// Every method fails with [`RoomStoreError::RoomNotFound`] when the room
/// does not exist.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Persist a new room and return it as stored.
    async fn create_room(&self, room: Room) -> Result<Room, RoomStoreError>;

    /// Delete a room with all its members and data.
    ///
    /// Fails with `NotOwner` unless `caller` owns the room.
    async fn delete_room(&self, room_id: &RoomId, caller: &UserId) -> Result<(), RoomStoreError>;

    /// Add a member. Joining twice replaces the previous member entry.
    async fn join_room(&self, room_id: &RoomId, user: User) -> Result<(), RoomStoreError>;

    /// Remove `kicked` from the room on behalf of `caller`.
    ///
    /// Deciding whether `caller` may remove `kicked` is the store's job.
    /// Fails with `MemberNotFound` when `kicked` is not a member.
    async fn leave_room(
        &self,
        room_id: &RoomId,
        caller: &UserId,
        kicked: &UserId,
    ) -> Result<(), RoomStoreError>;

    /// Whether `user_id` owns the room.
    async fn is_owner(&self, room_id: &RoomId, user_id: &UserId) -> Result<bool, RoomStoreError>;

    /// Fetch the full room state.
    async fn snapshot(&self, room_id: &RoomId) -> Result<RoomSnapshot, RoomStoreError>;

    /// Apply `action` to a single data item.
    ///
    /// Fails with `DataNotFound` or `TypeMismatch` as described on
    /// [`DataAction`]; a failed action leaves the stored item unchanged.
    async fn affect_data(
        &self,
        room_id: &RoomId,
        data_id: &DataId,
        action: DataAction,
        value: Option<Value>,
    ) -> Result<(), RoomStoreError>;
}
