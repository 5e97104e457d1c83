//! DeleteRoomHandler - Removes a room on behalf of its owner.

use std::sync::Arc;

use crate::application::RetryStrategy;
use crate::domain::foundation::{CommandContext, RoomId, UserId};
use crate::domain::room::{RoomDeleted, RoomError};
use crate::ports::RoomStore;

use super::call_store;

/// Command to delete a room.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRoomCommand {
    pub room_id: RoomId,
    pub user_id: UserId,
}

/// Handler for deleting rooms.
pub struct DeleteRoomHandler {
    store: Arc<dyn RoomStore>,
    retry: RetryStrategy,
}

impl DeleteRoomHandler {
    pub fn new(store: Arc<dyn RoomStore>, retry: RetryStrategy) -> Self {
        Self { store, retry }
    }

    pub async fn handle(
        &self,
        cmd: DeleteRoomCommand,
        ctx: &CommandContext,
    ) -> Result<RoomDeleted, RoomError> {
        // 1. Authorize - only the owner may delete
        let is_owner = call_store(&self.retry, ctx, "check room owner", || {
            self.store.is_owner(&cmd.room_id, &cmd.user_id)
        })
        .await?;

        if !is_owner {
            return Err(RoomError::not_owner(cmd.room_id, cmd.user_id));
        }

        // 2. Delete
        call_store(&self.retry, ctx, "delete room", || {
            self.store.delete_room(&cmd.room_id, &cmd.user_id)
        })
        .await?;

        tracing::info!(room_id = %cmd.room_id, "Room deleted");

        Ok(RoomDeleted {
            room_id: cmd.room_id,
        })
    }
}
