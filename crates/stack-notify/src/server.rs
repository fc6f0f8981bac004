//! HTTP ingress: one change event per request.
//!
//! The caller's retry behaviour provides at-least-once delivery, so a
//! publish failure answers `502` and the event is delivered again.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::relay::Relay;

/// Build the ingress router.
pub fn router(relay: Relay) -> Router {
    Router::new()
        .route("/events", post(handle_event))
        .route("/health", get(health_check))
        .with_state(relay)
}

async fn handle_event(State(relay): State<Relay>, body: Bytes) -> impl IntoResponse {
    let raw: Value = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Rejecting request body that is not JSON");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "status": "error", "error": "invalid JSON body" })),
            );
        }
    };

    match relay.handle_value(raw).await {
        Ok(outcome) => (StatusCode::OK, Json(json!(outcome))),
        Err(e) => {
            error!(error = %e, "Relay invocation failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "status": "error", "error": e.to_string() })),
            )
        }
    }
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
