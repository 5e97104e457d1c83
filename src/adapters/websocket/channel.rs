//! WebSocket halves adapted to the dispatcher's channel ports.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::Mutex;

use crate::domain::room::{Command, Event};
use crate::ports::{ChannelError, CommandSource, EventSink};

use super::messages::{decode_command, encode_event};

/// Reads commands from the socket's inbound half.
pub struct WebSocketSource {
    receiver: SplitStream<WebSocket>,
}

impl WebSocketSource {
    pub fn new(receiver: SplitStream<WebSocket>) -> Self {
        Self { receiver }
    }
}

#[async_trait]
impl CommandSource for WebSocketSource {
    async fn next_command(&mut self) -> Option<Result<Command, ChannelError>> {
        loop {
            let message = match self.receiver.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(ChannelError::transport(e))),
            };

            match message {
                Message::Text(text) => return Some(decode_command(&text)),
                Message::Binary(_) => {
                    return Some(Err(ChannelError::malformed(
                        "binary frames are not supported",
                    )))
                }
                Message::Close(_) => {
                    tracing::debug!("Client sent close frame");
                    return None;
                }
                // Protocol pings and pongs are answered by axum
                Message::Ping(_) | Message::Pong(_) => continue,
            }
        }
    }
}

/// Writes events to the socket's outbound half.
///
/// Shared by every in-flight command of the connection; writes are
/// serialized by a mutex.
pub struct WebSocketSink {
    sender: Mutex<SplitSink<WebSocket, Message>>,
}

impl WebSocketSink {
    pub fn new(sender: SplitSink<WebSocket, Message>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }

    /// Sends a close frame. Errors are ignored; the peer may be gone.
    pub async fn close(&self) {
        let _ = self.sender.lock().await.close().await;
    }
}

#[async_trait]
impl EventSink for WebSocketSink {
    async fn send(&self, event: &Event) -> Result<(), ChannelError> {
        let text = encode_event(event)?;
        self.sender
            .lock()
            .await
            .send(Message::Text(text))
            .await
            .map_err(ChannelError::transport)
    }
}
