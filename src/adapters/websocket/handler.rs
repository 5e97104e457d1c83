//! HTTP routes for the room service.
//!
//! - `GET /rooms/stream` upgrades to a WebSocket served by the
//!   [`CommandDispatcher`] until either side closes it
//! - `POST /rooms/command` accepts a single command and answers `{}`;
//!   single-shot execution is not offered

use std::sync::Arc;

use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::{get, post},
    Json, Router,
};
use futures::StreamExt;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::application::CommandDispatcher;
use crate::ports::EventSink;

use super::channel::{WebSocketSink, WebSocketSource};
use super::messages::WireCommand;

/// State shared by the room routes.
#[derive(Clone)]
pub struct RoomServiceState {
    pub dispatcher: CommandDispatcher,
}

impl RoomServiceState {
    pub fn new(dispatcher: CommandDispatcher) -> Self {
        Self { dispatcher }
    }
}

/// Builds the room service router with request ids and HTTP tracing.
pub fn room_router(state: RoomServiceState) -> Router {
    Router::new()
        .route("/rooms/stream", get(stream_handler))
        .route("/rooms/command", post(single_command))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}

/// Handle WebSocket upgrade requests for the command stream.
///
/// Route: `GET /rooms/stream`
pub async fn stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<RoomServiceState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.dispatcher))
}

async fn handle_socket(socket: WebSocket, dispatcher: CommandDispatcher) {
    let (sender, receiver) = socket.split();
    let sink = Arc::new(WebSocketSink::new(sender));
    let events: Arc<dyn EventSink> = sink.clone();

    match dispatcher.serve(WebSocketSource::new(receiver), events).await {
        Ok(()) => {
            sink.close().await;
            tracing::debug!("Stream ended");
        }
        Err(e) => tracing::warn!(error = %e, "Stream failed"),
    }
}

/// Route: `POST /rooms/command`
pub async fn single_command(
    State(_state): State<RoomServiceState>,
    Json(command): Json<WireCommand>,
) -> Json<serde_json::Value> {
    tracing::debug!(user_id = %command.user_id, "Single command ignored");
    Json(json!({}))
}
