//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the per-command context and the
//! error vocabulary shared by every other module.

mod command;
mod errors;
mod ids;
mod timestamp;

pub use command::CommandContext;
pub use errors::{ErrorCode, ValidationError};
pub use ids::{CommandId, DataId, RequestId, RoomId, UserId, UserName};
pub use timestamp::Timestamp;
