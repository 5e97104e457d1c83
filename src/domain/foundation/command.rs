//! Per-command execution context.
//!
//! Every command received by the dispatcher gets its own `CommandContext`:
//! a fresh request id for log correlation, the client-supplied command id
//! (if any), and a cancellation signal tied to the owning connection.
//!
//! Handlers accept the context by reference instead of a growing list of
//! loose parameters, so adding a field never changes a handler signature.

use tokio::sync::watch;

use super::{CommandId, RequestId};

/// Context that flows through a single command's processing pipeline.
#[derive(Debug, Clone)]
pub struct CommandContext {
    request_id: RequestId,
    command_id: Option<CommandId>,
    source: &'static str,
    cancelled: Option<watch::Receiver<bool>>,
}

impl CommandContext {
    /// Creates a context that can never be cancelled.
    pub fn new(command_id: Option<CommandId>) -> Self {
        Self {
            request_id: RequestId::new(),
            command_id,
            source: "stream",
            cancelled: None,
        }
    }

    /// Builder: bind the context to a connection-scoped cancellation signal.
    ///
    /// The context counts as cancelled once the sender publishes `true`
    /// or is dropped.
    pub fn with_cancellation(mut self, cancelled: watch::Receiver<bool>) -> Self {
        self.cancelled = Some(cancelled);
        self
    }

    /// Builder: add source identifier ("stream", "single", "test").
    pub fn with_source(mut self, source: &'static str) -> Self {
        self.source = source;
        self
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn command_id(&self) -> Option<&CommandId> {
        self.command_id.as_ref()
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Returns true once the owning connection has ended.
    pub fn is_cancelled(&self) -> bool {
        match &self.cancelled {
            None => false,
            Some(rx) => *rx.borrow() || rx.has_changed().is_err(),
        }
    }
}

#[cfg(test)]
impl CommandContext {
    /// Creates a test fixture with no command id and no cancellation.
    pub fn test_fixture() -> Self {
        Self::new(None).with_source("test")
    }
}
