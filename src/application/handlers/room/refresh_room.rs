//! RefreshRoomHandler - Returns the full room state.

use std::sync::Arc;

use crate::application::RetryStrategy;
use crate::domain::foundation::{CommandContext, RoomId, UserId};
use crate::domain::room::{RoomError, RoomSnapshot};
use crate::ports::RoomStore;

use super::call_store;

/// Query for a room snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshRoomCommand {
    pub room_id: RoomId,
    pub user_id: UserId,
}

/// Handler for room snapshots.
pub struct RefreshRoomHandler {
    store: Arc<dyn RoomStore>,
    retry: RetryStrategy,
}

impl RefreshRoomHandler {
    pub fn new(store: Arc<dyn RoomStore>, retry: RetryStrategy) -> Self {
        Self { store, retry }
    }

    pub async fn handle(
        &self,
        cmd: RefreshRoomCommand,
        ctx: &CommandContext,
    ) -> Result<RoomSnapshot, RoomError> {
        call_store(&self.retry, ctx, "refresh room", || {
            self.store.snapshot(&cmd.room_id)
        })
        .await
    }
}
