//! Duplex channel ports as seen by the command dispatcher.
//!
//! A connection is split into a [`CommandSource`] owned by the reader task
//! and an [`EventSink`] shared by every in-flight command.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::room::{Command, Event};

/// Errors raised by either half of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// One inbound frame could not be decoded. The connection stays open.
    ///
    /// Carries whatever envelope fields could be recovered so the error
    /// event can echo them.
    #[error("malformed command: {reason}")]
    Malformed {
        user_id: Option<String>,
        room_id: Option<String>,
        reason: String,
    },

    /// The underlying transport failed. The connection is unusable.
    #[error("transport error: {0}")]
    Transport(String),

    /// The peer is gone.
    #[error("channel closed")]
    Closed,
}

impl ChannelError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ChannelError::Malformed {
            user_id: None,
            room_id: None,
            reason: reason.into(),
        }
    }

    pub fn transport(message: impl ToString) -> Self {
        ChannelError::Transport(message.to_string())
    }

    /// Whether reading may continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ChannelError::Malformed { .. })
    }
}

/// Inbound half of a connection.
#[async_trait]
pub trait CommandSource: Send {
    /// Next decoded command, or `None` on clean end-of-stream.
    async fn next_command(&mut self) -> Option<Result<Command, ChannelError>>;
}

/// Outbound half of a connection.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send(&self, event: &Event) -> Result<(), ChannelError>;
}
