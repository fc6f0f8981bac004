//! Integration tests for the HTTP ingress.
//!
//! The router is served on a random local port and driven over HTTP.

mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use common::{fixture, relay, RecordingPublisher};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Start the ingress on a random port.
async fn start_server(publisher: Arc<RecordingPublisher>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = stack_notify::server::router(relay(publisher));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

async fn post_event(addr: SocketAddr, body: String) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/events"))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    let body = response.json::<Value>().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn test_health_check() {
    let addr = start_server(Arc::new(RecordingPublisher::default())).await;
    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_published_event_returns_channel() {
    let publisher = Arc::new(RecordingPublisher::default());
    let addr = start_server(publisher.clone()).await;

    let (status, body) = post_event(
        addr,
        fixture("resource_status_delete_skipped.json").to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "published", "channel": "C0358B7NE9W" }));
    assert_eq!(publisher.events().await.len(), 1);
}

#[tokio::test]
async fn test_suppressed_event_returns_ok() {
    let publisher = Arc::new(RecordingPublisher::default());
    let addr = start_server(publisher.clone()).await;

    let (status, body) = post_event(
        addr,
        fixture("resource_status_create_in_progress.json").to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "suppressed" }));
    assert!(publisher.events().await.is_empty());
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let addr = start_server(Arc::new(RecordingPublisher::default())).await;
    let (status, body) = post_event(addr, "{not json".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_publish_failure_is_bad_gateway() {
    let addr = start_server(Arc::new(RecordingPublisher::failing())).await;
    let (status, body) = post_event(
        addr,
        fixture("stack_status_create_failed.json").to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "error");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Event bus rejected"));
}
