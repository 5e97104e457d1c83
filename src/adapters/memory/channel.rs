//! In-memory duplex channel backed by tokio mpsc queues.
//!
//! Lets tests and embedders drive a [`CommandDispatcher`] without a
//! network transport.
//!
//! [`CommandDispatcher`]: crate::application::CommandDispatcher

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::room::{Command, Event};
use crate::ports::{ChannelError, CommandSource, EventSink};

const COMMAND_BUFFER: usize = 64;

type Inbound = Result<Command, ChannelError>;

/// Factory for connected channel halves.
pub struct InMemoryChannel;

impl InMemoryChannel {
    /// Creates a client handle plus the source/sink pair to serve.
    pub fn pair() -> (ChannelClient, InMemoryCommandSource, InMemoryEventSink) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (
            ChannelClient {
                commands: Some(command_tx),
                events: event_rx,
            },
            InMemoryCommandSource { commands: command_rx },
            InMemoryEventSink { events: event_tx },
        )
    }
}

/// The client end: pushes commands, receives events.
pub struct ChannelClient {
    commands: Option<mpsc::Sender<Inbound>>,
    events: mpsc::UnboundedReceiver<Event>,
}

impl ChannelClient {
    pub async fn send(&self, command: Command) -> Result<(), ChannelError> {
        self.push(Ok(command)).await
    }

    /// Injects a read error as if the transport produced it.
    pub async fn send_error(&self, error: ChannelError) -> Result<(), ChannelError> {
        self.push(Err(error)).await
    }

    async fn push(&self, item: Inbound) -> Result<(), ChannelError> {
        let commands = self.commands.as_ref().ok_or(ChannelError::Closed)?;
        commands.send(item).await.map_err(|_| ChannelError::Closed)
    }

    /// Ends the command stream. The server sees a clean end-of-stream.
    pub fn close(&mut self) {
        self.commands = None;
    }

    /// Next event, or `None` once every sink is dropped.
    pub async fn recv(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// Collects events until every sink is dropped.
    pub async fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(event) = self.events.recv().await {
            events.push(event);
        }
        events
    }
}

/// Server-side inbound half.
pub struct InMemoryCommandSource {
    commands: mpsc::Receiver<Inbound>,
}

#[async_trait]
impl CommandSource for InMemoryCommandSource {
    async fn next_command(&mut self) -> Option<Result<Command, ChannelError>> {
        self.commands.recv().await
    }
}

/// Server-side outbound half.
#[derive(Clone)]
pub struct InMemoryEventSink {
    events: mpsc::UnboundedSender<Event>,
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn send(&self, event: &Event) -> Result<(), ChannelError> {
        self.events
            .send(event.clone())
            .map_err(|_| ChannelError::Closed)
    }
}
