//! IdempotencyGuard - At-most-once execution per command id.
//!
//! ## How It Works
//!
//! 1. No command id: nothing is tracked, the command always runs
//! 2. Atomically reserve the id in the [`CommandCache`], owned by the
//!    unit's request id
//! 3. Reserved by another owner: the caller skips execution entirely
//! 4. After execution: refresh the entry so the TTL counts from completion
//!
//! A retried reservation whose earlier reply was lost finds its own owner
//! on the entry and still counts as reserved.
//!
//! ## Error Handling
//!
//! - Reservation errors (after retries) fail the command
//! - Refresh errors are logged and swallowed; the command already ran

use std::sync::Arc;

use crate::domain::foundation::{CommandContext, CommandId, RequestId};
use crate::domain::room::RoomError;
use crate::ports::CommandCache;

use super::RetryStrategy;

/// Outcome of [`IdempotencyGuard::check_and_reserve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reservation {
    /// The command carried no id and is not deduplicated.
    Untracked,
    /// First sighting; the id is now recorded for `owner`.
    Reserved { id: CommandId, owner: RequestId },
    /// The id was seen within the TTL window.
    Duplicate,
}

impl Reservation {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Reservation::Duplicate)
    }
}

/// Deduplicates commands by their client-supplied id.
#[derive(Clone)]
pub struct IdempotencyGuard {
    cache: Arc<dyn CommandCache>,
    retry: RetryStrategy,
}

impl IdempotencyGuard {
    pub fn new(cache: Arc<dyn CommandCache>, retry: RetryStrategy) -> Self {
        Self { cache, retry }
    }

    pub async fn check_and_reserve(&self, ctx: &CommandContext) -> Result<Reservation, RoomError> {
        let Some(id) = ctx.command_id() else {
            return Ok(Reservation::Untracked);
        };
        let owner = ctx.request_id();
        let token = owner.to_string();

        let recorded = self
            .retry
            .run(|| self.cache.save_if_absent(id, &token))
            .await?;

        if recorded {
            Ok(Reservation::Reserved {
                id: id.clone(),
                owner,
            })
        } else {
            tracing::debug!(command_id = %id, "Command id already seen");
            Ok(Reservation::Duplicate)
        }
    }

    /// Refreshes a reserved id. Never fails.
    pub async fn record(&self, reservation: &Reservation) {
        let Reservation::Reserved { id, owner } = reservation else {
            return;
        };
        let token = owner.to_string();

        if let Err(err) = self.retry.run(|| self.cache.save(id, &token)).await {
            tracing::warn!(command_id = %id, error = %err, "Failed to record command id");
        }
    }
}
