//! AffectDataHandler - Applies a data action to one item of room data.

use std::sync::Arc;

use crate::application::RetryStrategy;
use crate::domain::foundation::{CommandContext, DataId, RoomId, UserId};
use crate::domain::room::{DataAction, DataEdited, RoomError};
use crate::domain::value::Value;
use crate::ports::RoomStore;

use super::call_store;

/// Command to change one data item.
#[derive(Debug, Clone, PartialEq)]
pub struct AffectDataCommand {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub data_id: DataId,
    pub action: DataAction,
    /// Present for every action except `Delete`.
    pub value: Option<Value>,
}

/// Handler for data edits.
pub struct AffectDataHandler {
    store: Arc<dyn RoomStore>,
    retry: RetryStrategy,
}

impl AffectDataHandler {
    pub fn new(store: Arc<dyn RoomStore>, retry: RetryStrategy) -> Self {
        Self { store, retry }
    }

    pub async fn handle(
        &self,
        cmd: AffectDataCommand,
        ctx: &CommandContext,
    ) -> Result<DataEdited, RoomError> {
        call_store(&self.retry, ctx, "affect data", || {
            self.store
                .affect_data(&cmd.room_id, &cmd.data_id, cmd.action, cmd.value.clone())
        })
        .await?;

        tracing::debug!(
            room_id = %cmd.room_id,
            data_id = %cmd.data_id,
            action = %cmd.action,
            "Data edited"
        );

        let value = match cmd.action {
            DataAction::Delete => None,
            _ => cmd.value,
        };

        Ok(DataEdited {
            room_id: cmd.room_id,
            data_id: cmd.data_id,
            action: cmd.action,
            value,
        })
    }
}
