//! CommandDispatcher - The per-connection command loop.
//!
//! One task owns the inbound half of the connection. Every decoded command
//! becomes an independent unit of work running:
//!
//! 1. Validation into a typed [`RoomOperation`]
//! 2. Idempotency reservation (duplicates stop here, silently)
//! 3. The matching room handler
//! 4. Idempotency refresh
//! 5. Event delivery, with a single best-effort error event on failure
//!
//! Units carry no ordering relative to each other. At most
//! `max_in_flight` run at once; the reader waits for a free slot before
//! reading the next command.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{watch, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;

use crate::domain::foundation::{CommandContext, CommandId, Timestamp};
use crate::domain::room::{Command, Event, EventPayload, RoomError};
use crate::ports::{ChannelError, CommandCache, CommandSource, EventSink, RoomStore};

use super::handlers::RoomHandlers;
use super::{IdempotencyGuard, RetryStrategy, RoomOperation};

/// Default cap on concurrently executing commands per connection.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

/// Errors that end a connection.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("connection failed: {0}")]
    Transport(#[source] ChannelError),
}

/// Routes commands from a connection to room handlers and sends back events.
#[derive(Clone)]
pub struct CommandDispatcher {
    handlers: Arc<RoomHandlers>,
    guard: IdempotencyGuard,
    retry: RetryStrategy,
    max_in_flight: usize,
}

impl CommandDispatcher {
    pub fn new(
        store: Arc<dyn RoomStore>,
        cache: Arc<dyn CommandCache>,
        retry: RetryStrategy,
    ) -> Self {
        Self {
            handlers: Arc::new(RoomHandlers::new(store, retry)),
            guard: IdempotencyGuard::new(cache, retry),
            retry,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Builder: cap concurrently executing commands.
    ///
    /// Zero is raised to one and values above [`Semaphore::MAX_PERMITS`]
    /// are lowered to it.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.clamp(1, Semaphore::MAX_PERMITS);
        self
    }

    /// Serves one connection until end-of-stream or a transport failure.
    ///
    /// On clean end-of-stream, in-flight commands finish and deliver their
    /// events before this returns. On transport failure they are cancelled
    /// and aborted.
    pub async fn serve<S>(&self, mut source: S, sink: Arc<dyn EventSink>) -> Result<(), DispatchError>
    where
        S: CommandSource,
    {
        let permits = Arc::new(Semaphore::new(self.max_in_flight));
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let mut units = JoinSet::new();

        tracing::debug!(max_in_flight = self.max_in_flight, "Connection opened");

        let outcome = loop {
            while let Some(result) = units.try_join_next() {
                log_unit_result(result);
            }

            // The semaphore is never closed
            let Ok(permit) = permits.clone().acquire_owned().await else {
                break Ok(());
            };

            match source.next_command().await {
                None | Some(Err(ChannelError::Closed)) => break Ok(()),
                Some(Ok(command)) => {
                    let dispatcher = self.clone();
                    let sink = sink.clone();
                    let cancelled = cancel_rx.clone();
                    units.spawn(async move {
                        dispatcher.run_unit(command, sink, cancelled).await;
                        drop(permit);
                    });
                }
                Some(Err(ChannelError::Malformed {
                    user_id,
                    room_id,
                    reason,
                })) => {
                    tracing::warn!(reason = %reason, "Malformed command");
                    let event = Event {
                        timestamp: Timestamp::now(),
                        room_id: room_id.unwrap_or_default(),
                        user_id: user_id.unwrap_or_default(),
                        payload: EventPayload::error(format!("malformed command: {}", reason)),
                    };
                    let dispatcher = self.clone();
                    let sink = sink.clone();
                    units.spawn(async move {
                        dispatcher.deliver(sink.as_ref(), event).await;
                        drop(permit);
                    });
                }
                Some(Err(err)) => break Err(err),
            }
        };

        match outcome {
            Ok(()) => {
                while let Some(result) = units.join_next().await {
                    log_unit_result(result);
                }
                let _ = cancel_tx.send(true);
                tracing::debug!("Connection closed");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, in_flight = units.len(), "Connection failed");
                let _ = cancel_tx.send(true);
                units.abort_all();
                while units.join_next().await.is_some() {}
                Err(DispatchError::Transport(err))
            }
        }
    }

    async fn run_unit(&self, command: Command, sink: Arc<dyn EventSink>, cancelled: watch::Receiver<bool>) {
        let command_id = command
            .command_id
            .as_deref()
            .and_then(|raw| CommandId::new(raw).ok());
        let ctx = CommandContext::new(command_id).with_cancellation(cancelled);

        let span = tracing::info_span!(
            "command",
            request_id = %ctx.request_id(),
            command_id = ?command.command_id,
            kind = command.kind(),
            source = ctx.source(),
        );

        async {
            if let Some(event) = self.process(command, &ctx).await {
                self.deliver(sink.as_ref(), event).await;
            }
        }
        .instrument(span)
        .await
    }

    /// Runs one command's pipeline and returns the event to emit, if any.
    ///
    /// Returns `None` only for duplicates.
    pub async fn process(&self, command: Command, ctx: &CommandContext) -> Option<Event> {
        let operation = match RoomOperation::from_command(&command) {
            Ok(operation) => operation,
            Err(err) => return Some(failure(&command, err.into())),
        };

        let reservation = match self.guard.check_and_reserve(ctx).await {
            Ok(reservation) => reservation,
            Err(err) => return Some(failure(&command, err)),
        };

        if reservation.is_duplicate() {
            tracing::info!("Skipping duplicate command");
            return None;
        }

        let result = self.execute(operation, ctx).await;
        self.guard.record(&reservation).await;

        let event = match result {
            Ok(payload) => {
                let mut event = Event::reply_to(&command, payload);
                if let EventPayload::RoomCreated(created) = &event.payload {
                    event.room_id = created.room_id.to_string();
                }
                event
            }
            Err(err) => failure(&command, err),
        };
        Some(event)
    }

    async fn execute(
        &self,
        operation: RoomOperation,
        ctx: &CommandContext,
    ) -> Result<EventPayload, RoomError> {
        let handlers = &self.handlers;
        let payload = match operation {
            RoomOperation::CreateRoom(cmd) => {
                EventPayload::RoomCreated(handlers.create_room.handle(cmd, ctx).await?)
            }
            RoomOperation::DeleteRoom(cmd) => {
                EventPayload::RoomDeleted(handlers.delete_room.handle(cmd, ctx).await?)
            }
            RoomOperation::JoinRoom(cmd) => {
                EventPayload::JoinedRoom(handlers.join_room.handle(cmd, ctx).await?)
            }
            RoomOperation::LeaveRoom(cmd) => {
                EventPayload::LeftRoom(handlers.leave_room.handle(cmd, ctx).await?)
            }
            RoomOperation::AffectData(cmd) => {
                EventPayload::DataEdited(handlers.affect_data.handle(cmd, ctx).await?)
            }
            RoomOperation::RefreshRoom(cmd) => {
                EventPayload::FullRoom(handlers.refresh_room.handle(cmd, ctx).await?)
            }
        };
        Ok(payload)
    }

    /// Sends `event` with retries, then falls back to one error event.
    async fn deliver(&self, sink: &dyn EventSink, event: Event) {
        match self.retry.run(|| sink.send(&event)).await {
            Ok(()) => tracing::debug!(event = event.payload.kind(), "Event sent"),
            Err(err) => {
                tracing::warn!(event = event.payload.kind(), error = %err, "Failed to send event");
                let fallback = event.to_error(format!("failed to send event: {}", err));
                if let Err(err) = sink.send(&fallback).await {
                    tracing::error!(error = %err, "Failed to send error event");
                }
            }
        }
    }
}

fn failure(command: &Command, err: RoomError) -> Event {
    tracing::warn!(code = %err.code(), error = %err, "Command failed");
    Event::error_for(command, err.to_string())
}

fn log_unit_result(result: Result<(), JoinError>) {
    if let Err(err) = result {
        if err.is_panic() {
            tracing::error!(error = %err, "Command task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryChannel, InMemoryCommandCache, InMemoryRoomStore};
    use crate::domain::room::{CommandPayload, UserFields};
    use std::collections::HashMap;
    use std::time::Duration;

    fn dispatcher() -> CommandDispatcher {
        CommandDispatcher::new(
            Arc::new(InMemoryRoomStore::new()),
            Arc::new(InMemoryCommandCache::new(Duration::from_secs(60))),
            RetryStrategy::new(2, Duration::ZERO, 1.0),
        )
    }

    fn create(user: &str) -> Command {
        Command::new(
            user,
            CommandPayload::CreateRoom {
                options: HashMap::new(),
            },
        )
    }

    #[tokio::test]
    async fn created_room_id_replaces_envelope_room_id() {
        let event = dispatcher()
            .process(create("u1"), &CommandContext::test_fixture())
            .await
            .unwrap();

        let EventPayload::RoomCreated(created) = &event.payload else {
            panic!("expected RoomCreated, got {:?}", event.payload);
        };
        assert_eq!(event.room_id, created.room_id.to_string());
        assert_eq!(event.user_id, "u1");
    }

    #[tokio::test]
    async fn validation_failure_becomes_error_event() {
        let command = Command::new("u1", CommandPayload::RefreshRoom).in_room("nope");

        let event = dispatcher()
            .process(command, &CommandContext::test_fixture())
            .await
            .unwrap();

        assert!(event.is_error());
        assert_eq!(event.room_id, "nope");
    }

    #[tokio::test]
    async fn duplicate_command_yields_no_event() {
        let dispatcher = dispatcher();
        let ctx = || CommandContext::new(Some(CommandId::new("c1").unwrap()));

        let first = dispatcher.process(create("u1"), &ctx()).await;
        let second = dispatcher.process(create("u1"), &ctx()).await;

        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn in_flight_limit_is_clamped_to_semaphore_range() {
        assert_eq!(dispatcher().with_max_in_flight(0).max_in_flight, 1);

        let dispatcher = dispatcher().with_max_in_flight(usize::MAX);
        assert_eq!(dispatcher.max_in_flight, Semaphore::MAX_PERMITS);

        let (mut client, source, sink) = InMemoryChannel::pair();
        let server = tokio::spawn(async move { dispatcher.serve(source, Arc::new(sink)).await });
        client.send(create("u1")).await.unwrap();
        client.close();

        server.await.unwrap().unwrap();
        assert_eq!(client.drain().await.len(), 1);
    }

    #[tokio::test]
    async fn serve_answers_every_command_then_returns() {
        let (mut client, source, sink) = InMemoryChannel::pair();
        let dispatcher = dispatcher();
        let server = tokio::spawn(async move { dispatcher.serve(source, Arc::new(sink)).await });

        client.send(create("u1")).await.unwrap();
        client
            .send(
                Command::new(
                    "u1",
                    CommandPayload::JoinRoom {
                        user: UserFields::new("u2", "Bob"),
                    },
                )
                .in_room("not-a-uuid"),
            )
            .await
            .unwrap();
        client.close();

        server.await.unwrap().unwrap();
        let events = client.drain().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events.iter().filter(|e| e.is_error()).count(), 1);
    }
}
