//! Domain layer containing the room vocabulary.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamp, command context, errors)
//! - `value` - Polymorphic room data
//! - `room` - Rooms, members, commands, events and room errors

pub mod foundation;
pub mod room;
pub mod value;
