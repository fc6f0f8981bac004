//! One relay invocation: log, classify, publish.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::classify::{classify, Classification};
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::events::ChangeEvent;
use crate::publish::{OutboundEvent, Publisher};

/// What an invocation did with its event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// A message was accepted by the relay bus
    Published { channel: String },
    /// Routing rules chose not to announce the event
    Suppressed,
    /// Unrecognised or malformed event
    Ignored,
}

/// Turns change events into relay events.
///
/// Holds only immutable configuration and a publisher, so one instance can
/// serve concurrent invocations.
#[derive(Clone)]
pub struct Relay {
    config: Arc<RelayConfig>,
    publisher: Arc<dyn Publisher>,
}

impl Relay {
    /// Create a relay.
    #[must_use]
    pub fn new(config: Arc<RelayConfig>, publisher: Arc<dyn Publisher>) -> Self {
        Self { config, publisher }
    }

    /// Process one event to completion.
    ///
    /// # Errors
    ///
    /// Returns an error only if publishing fails; the caller should treat
    /// the invocation as failed so the event is redelivered.
    pub async fn handle(&self, event: &ChangeEvent) -> Result<Outcome, RelayError> {
        // Unmodelled envelope fields are kept in `extra`, so this is the event as received
        match serde_json::to_string(event) {
            Ok(raw) => info!(event = %raw, time = ?event.timestamp(), "Received change event"),
            Err(e) => debug!(error = %e, "Could not re-serialize change event for logging"),
        }
        self.process(event).await
    }

    /// Decode and process a raw JSON event.
    ///
    /// Input that is not a change envelope at all is ignored rather than
    /// failing the invocation.
    ///
    /// # Errors
    ///
    /// Returns an error only if publishing fails.
    pub async fn handle_value(&self, raw: serde_json::Value) -> Result<Outcome, RelayError> {
        info!(event = %raw, "Received change event");

        match serde_json::from_value::<ChangeEvent>(raw) {
            Ok(event) => self.process(&event).await,
            Err(e) => {
                info!(error = %e, "Ignoring payload that is not a change event");
                Ok(Outcome::Ignored)
            }
        }
    }

    async fn process(&self, event: &ChangeEvent) -> Result<Outcome, RelayError> {
        let category = event.category();
        let message = match classify(event, &self.config) {
            Classification::Notify(message) => message,
            Classification::Suppressed => {
                info!(
                    category = category.as_str(),
                    account = %event.account,
                    region = %event.region,
                    "No notification for event"
                );
                return Ok(Outcome::Suppressed);
            }
            Classification::Ignored => {
                debug!(detail_type = %event.detail_type, "Ignoring unrecognised event");
                return Ok(Outcome::Ignored);
            }
        };

        let outbound = OutboundEvent::new(&message, &self.config.outbound)?;

        if let Err(e) = self.publisher.publish(&outbound).await {
            error!(
                publisher = self.publisher.name(),
                channel = %outbound.channel,
                error = %e,
                "Failed to publish notification"
            );
            return Err(e.into());
        }

        info!(
            publisher = self.publisher.name(),
            category = category.as_str(),
            channel = %outbound.channel,
            "Notification published"
        );
        Ok(Outcome::Published {
            channel: outbound.channel,
        })
    }
}
