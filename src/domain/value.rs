//! Polymorphic room data.
//!
//! A [`Value`] is exactly one of: empty, 64-bit integer, string, boolean,
//! 64-bit float, binary blob, ordered list of values, or string-keyed map
//! of values. Being a Rust enum, the active variant alone determines which
//! payload exists; every `set_*` mutator replaces the whole value so no
//! stale payload can survive a reassignment.
//!
//! Equality is structural and recursive: lists compare element-wise in
//! order, maps compare by key set and per-key equality regardless of
//! insertion order, and values of different kinds are never equal.

use std::collections::HashMap;
use std::fmt;

/// Universal value type for room data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Empty,
    Int(i64),
    Str(String),
    Bool(bool),
    Float(f64),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
}

/// The tag of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Empty,
    Int,
    Str,
    Bool,
    Float,
    Bytes,
    List,
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::Empty => "empty",
            ValueKind::Int => "int",
            ValueKind::Str => "string",
            ValueKind::Bool => "bool",
            ValueKind::Float => "float",
            ValueKind::Bytes => "binary",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        };
        write!(f, "{}", s)
    }
}

impl Value {
    pub fn empty() -> Self {
        Value::Empty
    }

    pub fn int(value: i64) -> Self {
        Value::Int(value)
    }

    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }

    pub fn bool(value: bool) -> Self {
        Value::Bool(value)
    }

    pub fn float(value: f64) -> Self {
        Value::Float(value)
    }

    /// Creates a binary value holding a copy of `value`.
    pub fn bytes(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }

    /// Creates a list value holding a deep copy of `items`.
    ///
    /// Later changes to the caller's slice never reach the stored value.
    pub fn list(items: &[Value]) -> Self {
        Value::List(items.to_vec())
    }

    /// Creates a map value holding a deep copy of `entries`.
    pub fn map(entries: &HashMap<String, Value>) -> Self {
        Value::Map(entries.clone())
    }

    pub fn set_empty(&mut self) {
        *self = Value::Empty;
    }

    pub fn set_int(&mut self, value: i64) {
        *self = Value::Int(value);
    }

    pub fn set_str(&mut self, value: impl Into<String>) {
        *self = Value::Str(value.into());
    }

    pub fn set_bool(&mut self, value: bool) {
        *self = Value::Bool(value);
    }

    pub fn set_float(&mut self, value: f64) {
        *self = Value::Float(value);
    }

    pub fn set_bytes(&mut self, value: &[u8]) {
        *self = Value::bytes(value);
    }

    pub fn set_list(&mut self, items: &[Value]) {
        *self = Value::list(items);
    }

    pub fn set_map(&mut self, entries: &HashMap<String, Value>) {
        *self = Value::map(entries);
    }

    /// Returns the tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Empty => ValueKind::Empty,
            Value::Int(_) => ValueKind::Int,
            Value::Str(_) => ValueKind::Str,
            Value::Bool(_) => ValueKind::Bool,
            Value::Float(_) => ValueKind::Float,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(entries: HashMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}

/// Proptest strategy producing arbitrary nested values.
///
/// Floats are restricted to quarter steps so they survive a text
/// round-trip exactly; NaN is excluded because it never equals itself.
#[cfg(test)]
pub(crate) fn arb_value() -> impl proptest::strategy::Strategy<Value = Value> {
    use proptest::collection::{hash_map, vec};
    use proptest::prelude::*;

    let leaf = prop_oneof![
        Just(Value::Empty),
        any::<i64>().prop_map(Value::Int),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::Str),
        any::<bool>().prop_map(Value::Bool),
        (-1_000_000i64..1_000_000).prop_map(|n| Value::Float(n as f64 / 4.0)),
        vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
    ];

    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..6).prop_map(Value::List),
            hash_map("[a-z]{1,6}", inner, 0..6).prop_map(Value::Map),
        ]
    })
}
