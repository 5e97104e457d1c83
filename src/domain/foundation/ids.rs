//! Strongly-typed identifier value objects.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for a room.
///
/// Always generated server-side on room creation; every other command
/// carries it as a string that must parse as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomId(Uuid);

impl RoomId {
    /// Creates a new random RoomId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a RoomId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parses a client-supplied room id.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        raw.parse()
            .map_err(|_| ValidationError::invalid_format("room_id", format!("'{}' is not a valid uuid", raw)))
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoomId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier of a single command execution inside the service.
///
/// Unlike [`CommandId`], this is never client-supplied: the dispatcher
/// allocates one per received command so that every log line of a unit
/// of work can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! non_empty_text {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new `", stringify!($name), "`, returning error if empty.")]
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(value))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier, returning the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

non_empty_text!(
    /// User identifier as supplied by the client gateway.
    UserId,
    "user_id"
);

non_empty_text!(
    /// Display name of a room member.
    UserName,
    "user_name"
);

non_empty_text!(
    /// Key of a data item inside a room's value store.
    DataId,
    "data_id"
);

non_empty_text!(
    /// Client-supplied command identifier used for deduplication.
    CommandId,
    "command_id"
);
