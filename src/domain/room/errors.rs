//! Room-specific error types.
//!
//! `RoomStoreError` and `CacheError` are what the ports report;
//! `RoomError` is what a handler reports, adding the context of the
//! operation that failed. Its display text is what the client sees in an
//! `ErrorMessage` event.

use thiserror::Error;

use crate::domain::foundation::{DataId, ErrorCode, RoomId, UserId, ValidationError};
use crate::domain::value::ValueKind;

/// Errors reported by a [`RoomStore`](crate::ports::RoomStore).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoomStoreError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(RoomId),

    #[error("user '{user_id}' is not in room '{room_id}'")]
    MemberNotFound { room_id: RoomId, user_id: UserId },

    #[error("data item '{data_id}' does not exist in room '{room_id}'")]
    DataNotFound { room_id: RoomId, data_id: DataId },

    #[error("data item '{data_id}' holds a {found} value, expected {expected}")]
    TypeMismatch {
        data_id: DataId,
        expected: &'static str,
        found: ValueKind,
    },

    #[error("user '{user_id}' is not allowed to modify room '{room_id}'")]
    NotOwner { room_id: RoomId, user_id: UserId },

    #[error("room '{0}' already exists")]
    AlreadyExists(RoomId),

    #[error("room store unavailable: {0}")]
    Unavailable(String),
}

impl RoomStoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        RoomStoreError::Unavailable(message.into())
    }

    /// Only infrastructure failures are worth another attempt; every other
    /// variant is a definitive answer from the store.
    pub fn is_transient(&self) -> bool {
        matches!(self, RoomStoreError::Unavailable(_))
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RoomStoreError::RoomNotFound(_) => ErrorCode::RoomNotFound,
            RoomStoreError::MemberNotFound { .. } => ErrorCode::MemberNotFound,
            RoomStoreError::DataNotFound { .. } => ErrorCode::DataNotFound,
            RoomStoreError::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            RoomStoreError::NotOwner { .. } => ErrorCode::Forbidden,
            RoomStoreError::AlreadyExists(_) => ErrorCode::RoomAlreadyExists,
            RoomStoreError::Unavailable(_) => ErrorCode::StoreError,
        }
    }
}

/// Errors reported by a [`CommandCache`](crate::ports::CommandCache).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command cache unavailable: {0}")]
pub struct CacheError(pub String);

impl CacheError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Failure of a single command, as surfaced to the client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoomError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("user '{user_id}' is not a room owner ({room_id})")]
    NotOwner { room_id: RoomId, user_id: UserId },

    #[error("failed to {action}: {source}")]
    Store {
        action: &'static str,
        #[source]
        source: RoomStoreError,
    },

    #[error("failed to check command id: {0}")]
    Cache(#[from] CacheError),

    #[error("command cancelled: connection closed")]
    Cancelled,
}

impl RoomError {
    pub fn store(action: &'static str, source: RoomStoreError) -> Self {
        RoomError::Store { action, source }
    }

    pub fn not_owner(room_id: RoomId, user_id: UserId) -> Self {
        RoomError::NotOwner { room_id, user_id }
    }

    /// Whether the retry executor should try the failed call again.
    pub fn is_retryable(&self) -> bool {
        match self {
            RoomError::Store { source, .. } => source.is_transient(),
            RoomError::Cache(_) => true,
            RoomError::Validation(_) | RoomError::NotOwner { .. } | RoomError::Cancelled => false,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RoomError::Validation(_) => ErrorCode::ValidationFailed,
            RoomError::NotOwner { .. } => ErrorCode::Forbidden,
            RoomError::Store { source, .. } => source.code(),
            RoomError::Cache(_) => ErrorCode::CacheError,
            RoomError::Cancelled => ErrorCode::Cancelled,
        }
    }
}
