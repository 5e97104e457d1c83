//! CreateRoomHandler - Allocates a room owned by the caller.

use std::collections::HashMap;
use std::sync::Arc;

use crate::application::RetryStrategy;
use crate::domain::foundation::{CommandContext, UserId};
use crate::domain::room::{Room, RoomCreated, RoomError};
use crate::ports::RoomStore;

use super::call_store;

/// Command to create a room.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRoomCommand {
    pub user_id: UserId,
    pub options: HashMap<String, String>,
}

/// Handler for creating rooms.
pub struct CreateRoomHandler {
    store: Arc<dyn RoomStore>,
    retry: RetryStrategy,
}

impl CreateRoomHandler {
    pub fn new(store: Arc<dyn RoomStore>, retry: RetryStrategy) -> Self {
        Self { store, retry }
    }

    pub async fn handle(
        &self,
        cmd: CreateRoomCommand,
        ctx: &CommandContext,
    ) -> Result<RoomCreated, RoomError> {
        // The id is allocated once so every retry persists the same room
        let room = Room::new(cmd.user_id, cmd.options);

        let created = call_store(&self.retry, ctx, "create room", || {
            self.store.create_room(room.clone())
        })
        .await?;

        tracing::info!(room_id = %created.id, owner = %created.owner, "Room created");

        Ok(RoomCreated {
            room_id: created.id,
            options: created.options,
        })
    }
}
