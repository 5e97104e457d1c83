//! LeaveRoomHandler - Removes a member, either by themselves or by the owner.

use std::sync::Arc;

use crate::application::RetryStrategy;
use crate::domain::foundation::{CommandContext, RoomId, UserId};
use crate::domain::room::{LeftRoom, RoomError};
use crate::ports::RoomStore;

use super::call_store;

/// Command to leave (or kick someone from) a room.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRoomCommand {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub kicked_user_id: UserId,
}

/// Handler for leaving rooms.
///
/// Whether the caller may remove the kicked user is decided by the store.
pub struct LeaveRoomHandler {
    store: Arc<dyn RoomStore>,
    retry: RetryStrategy,
}

impl LeaveRoomHandler {
    pub fn new(store: Arc<dyn RoomStore>, retry: RetryStrategy) -> Self {
        Self { store, retry }
    }

    pub async fn handle(
        &self,
        cmd: LeaveRoomCommand,
        ctx: &CommandContext,
    ) -> Result<LeftRoom, RoomError> {
        call_store(&self.retry, ctx, "leave room", || {
            self.store
                .leave_room(&cmd.room_id, &cmd.user_id, &cmd.kicked_user_id)
        })
        .await?;

        Ok(LeftRoom {
            room_id: cmd.room_id,
            kicked_user_id: cmd.kicked_user_id,
        })
    }
}
