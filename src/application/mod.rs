//! Application layer - Command pipeline and handlers.
//!
//! This layer validates commands, deduplicates them, runs room handlers
//! against the store ports and turns their results into events.

mod dispatcher;
pub mod handlers;
mod idempotency;
mod operation;
mod retry;

pub use dispatcher::{CommandDispatcher, DispatchError, DEFAULT_MAX_IN_FLIGHT};
pub use idempotency::{IdempotencyGuard, Reservation};
pub use operation::RoomOperation;
pub use retry::RetryStrategy;
