//! Room, member and snapshot models.

use std::collections::HashMap;
use std::fmt;

use crate::domain::foundation::{RoomId, UserId, UserName};
use crate::domain::value::Value;

/// A shared room: an owner, free-form options, members and data.
///
/// The owner and options are fixed at creation; everything else changes
/// through membership and data operations on the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub owner: UserId,
    pub options: HashMap<String, String>,
}

impl Room {
    /// Creates a room with a freshly generated id.
    pub fn new(owner: UserId, options: HashMap<String, String>) -> Self {
        Self {
            id: RoomId::new(),
            owner,
            options,
        }
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner == user_id
    }
}

/// A room member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub metadata: HashMap<String, String>,
}

impl User {
    pub fn new(id: UserId, name: UserName, metadata: HashMap<String, String>) -> Self {
        Self { id, name, metadata }
    }
}

/// Read-only view of a room with its members and data.
///
/// Built on demand by the store; never cached and never partial.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub room: Room,
    pub users: Vec<User>,
    pub values: HashMap<String, Value>,
}

/// How an `AffectData` command changes a data item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataAction {
    /// Replace or create the item.
    Set,
    /// Remove the item entirely.
    Delete,
    /// Push onto a list item, creating the list if absent.
    Append,
    /// Remove one matching element from a list, or one key from a map.
    Remove,
}

impl DataAction {
    /// Whether the action needs a value argument.
    pub fn requires_value(&self) -> bool {
        !matches!(self, DataAction::Delete)
    }
}

impl fmt::Display for DataAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataAction::Set => "set",
            DataAction::Delete => "delete",
            DataAction::Append => "append",
            DataAction::Remove => "remove",
        };
        write!(f, "{}", s)
    }
}
