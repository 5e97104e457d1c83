//! Room command handlers.
//!
//! Each handler receives an already validated command, runs its store calls
//! through the retry executor and returns a typed event payload.

mod affect_data;
mod create_room;
mod delete_room;
mod join_room;
mod leave_room;
mod refresh_room;

#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;
use std::sync::Arc;

pub use affect_data::{AffectDataCommand, AffectDataHandler};
pub use create_room::{CreateRoomCommand, CreateRoomHandler};
pub use delete_room::{DeleteRoomCommand, DeleteRoomHandler};
pub use join_room::{JoinRoomCommand, JoinRoomHandler};
pub use leave_room::{LeaveRoomCommand, LeaveRoomHandler};
pub use refresh_room::{RefreshRoomCommand, RefreshRoomHandler};

use crate::application::RetryStrategy;
use crate::domain::foundation::CommandContext;
use crate::domain::room::{RoomError, RoomStoreError};
use crate::ports::RoomStore;

/// One handler per command kind, sharing a store and retry strategy.
pub struct RoomHandlers {
    pub create_room: CreateRoomHandler,
    pub delete_room: DeleteRoomHandler,
    pub join_room: JoinRoomHandler,
    pub leave_room: LeaveRoomHandler,
    pub affect_data: AffectDataHandler,
    pub refresh_room: RefreshRoomHandler,
}

impl RoomHandlers {
    pub fn new(store: Arc<dyn RoomStore>, retry: RetryStrategy) -> Self {
        Self {
            create_room: CreateRoomHandler::new(store.clone(), retry),
            delete_room: DeleteRoomHandler::new(store.clone(), retry),
            join_room: JoinRoomHandler::new(store.clone(), retry),
            leave_room: LeaveRoomHandler::new(store.clone(), retry),
            affect_data: AffectDataHandler::new(store.clone(), retry),
            refresh_room: RefreshRoomHandler::new(store, retry),
        }
    }
}

/// Runs one store call under `retry`.
///
/// Cancellation is checked before every attempt. Store errors are wrapped
/// with `action` and only transient ones are retried.
pub(crate) async fn call_store<T, F, Fut>(
    retry: &RetryStrategy,
    ctx: &CommandContext,
    action: &'static str,
    mut op: F,
) -> Result<T, RoomError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RoomStoreError>>,
{
    retry
        .run_if(
            || {
                let call = op();
                async move {
                    if ctx.is_cancelled() {
                        return Err(RoomError::Cancelled);
                    }
                    call.await.map_err(|err| RoomError::store(action, err))
                }
            },
            RoomError::is_retryable,
        )
        .await
}
