//! Room Service - Collaborative rooms driven by a command/event stream
//!
//! Clients send commands over a long-lived duplex channel and receive one
//! event per command describing its effect. Commands are deduplicated by
//! client-supplied id, run against a shared room store with retries, and
//! execute concurrently per connection up to a fixed limit.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
