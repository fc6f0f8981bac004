//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use stack_notify::{OutboundEvent, PublishError, Publisher, Relay, RelayConfig};
use tokio::sync::Mutex;

/// Publisher that records every event and can be told to fail.
#[derive(Default)]
pub struct RecordingPublisher {
    /// Events accepted so far.
    pub published: Mutex<Vec<OutboundEvent>>,
    /// When set, every publish fails.
    pub fail: AtomicBool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        let publisher = Self::default();
        publisher.fail.store(true, Ordering::SeqCst);
        publisher
    }

    pub async fn events(&self) -> Vec<OutboundEvent> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn publish(&self, event: &OutboundEvent) -> Result<(), PublishError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PublishError::Rejected {
                failed: 1,
                detail: "InternalFailure: simulated".to_string(),
            });
        }
        self.published.lock().await.push(event.clone());
        Ok(())
    }
}

/// Relay with default configuration around `publisher`.
pub fn relay(publisher: Arc<RecordingPublisher>) -> Relay {
    Relay::new(Arc::new(RelayConfig::default()), publisher)
}

/// Load a JSON fixture from `tests/fixtures`.
pub fn fixture(name: &str) -> serde_json::Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let contents = std::fs::read_to_string(&path).unwrap();
    serde_json::from_str(&contents).unwrap()
}
