//! HTTP-level tests for the room service router.
//!
//! Verifies:
//! 1. `POST /rooms/command` accepts a command and answers `{}`
//! 2. Malformed bodies are rejected by the JSON extractor
//! 3. Request ids are generated or propagated on every response
//! 4. The stream route only accepts WebSocket upgrades

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::Router;
use http::{header, Request, StatusCode};
use tower::ServiceExt;

use room_service::adapters::memory::{InMemoryCommandCache, InMemoryRoomStore};
use room_service::adapters::websocket::{room_router, RoomServiceState};
use room_service::application::{CommandDispatcher, RetryStrategy};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn test_app() -> (Router, InMemoryRoomStore) {
    let store = InMemoryRoomStore::new();
    let dispatcher = CommandDispatcher::new(
        Arc::new(store.clone()),
        Arc::new(InMemoryCommandCache::new(Duration::from_secs(60))),
        RetryStrategy::no_retry(),
    );
    (room_router(RoomServiceState::new(dispatcher)), store)
}

fn post_command(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/rooms/command")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Single command endpoint
// =============================================================================

#[tokio::test]
async fn single_command_answers_empty_object() {
    let (app, store) = test_app();

    let response = app
        .oneshot(post_command(
            r#"{"userId":"u1","payload":{"createRoom":{"options":{}}}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({}));
    assert_eq!(store.room_count().await, 0);
}

#[tokio::test]
async fn single_command_rejects_invalid_json() {
    let (app, _) = test_app();

    let response = app.oneshot(post_command("{not json")).await.unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn single_command_rejects_unknown_payload() {
    let (app, _) = test_app();

    let response = app
        .oneshot(post_command(r#"{"userId":"u1","payload":{"dance":{}}}"#))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// =============================================================================
// Request ids
// =============================================================================

#[tokio::test]
async fn response_carries_generated_request_id() {
    let (app, _) = test_app();

    let response = app
        .oneshot(post_command(r#"{"userId":"u1","payload":{"refreshRoom":{}}}"#))
        .await
        .unwrap();

    let request_id = response.headers().get("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn client_request_id_is_propagated() {
    let (app, _) = test_app();
    let mut request = post_command(r#"{"userId":"u1","payload":{"refreshRoom":{}}}"#);
    request
        .headers_mut()
        .insert("x-request-id", "trace-me".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-me");
}

// =============================================================================
// Stream endpoint
// =============================================================================

#[tokio::test]
async fn stream_requires_websocket_upgrade() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/rooms/stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
