//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' is required")]
    MissingField { field: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a missing field validation error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        ValidationError::MissingField { field: field.into() }
    }
}

/// Error codes organized by category.
///
/// Logged alongside every failed command so operators can aggregate
/// failures without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Authorization errors
    Forbidden,

    // Not found errors
    RoomNotFound,
    MemberNotFound,
    DataNotFound,

    // State errors
    TypeMismatch,
    RoomAlreadyExists,

    // Infrastructure errors
    StoreError,
    CacheError,
    Cancelled,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::RoomNotFound => "ROOM_NOT_FOUND",
            ErrorCode::MemberNotFound => "MEMBER_NOT_FOUND",
            ErrorCode::DataNotFound => "DATA_NOT_FOUND",
            ErrorCode::TypeMismatch => "TYPE_MISMATCH",
            ErrorCode::RoomAlreadyExists => "ROOM_ALREADY_EXISTS",
            ErrorCode::StoreError => "STORE_ERROR",
            ErrorCode::CacheError => "CACHE_ERROR",
            ErrorCode::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}
