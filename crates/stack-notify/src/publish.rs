//! Publishing formatted messages to the downstream chat relay.
//!
//! The relay listens on an event bus for events with a fixed source and
//! detail type whose detail is the serialized [`NotificationMessage`].

use async_trait::async_trait;
use aws_sdk_eventbridge::error::ProvideErrorMetadata;
use aws_sdk_eventbridge::types::PutEventsRequestEntry;
use tracing::{debug, info, warn};

use crate::config::OutboundConfig;
use crate::error::PublishError;
use crate::message::NotificationMessage;

/// One event bound for the relay bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEvent {
    pub source: String,
    pub detail_type: String,
    /// Serialized [`NotificationMessage`]
    pub detail: String,
    pub event_bus_name: Option<String>,
    /// Channel the message is routed to, for logging
    pub channel: String,
}

impl OutboundEvent {
    /// Wrap a message for the relay bus.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be serialized.
    pub fn new(
        message: &NotificationMessage,
        config: &OutboundConfig,
    ) -> Result<Self, PublishError> {
        Ok(Self {
            source: config.source.clone(),
            detail_type: config.detail_type.clone(),
            detail: message.to_json()?,
            event_bus_name: config.event_bus_name.clone(),
            channel: message.channel.clone(),
        })
    }
}

/// Destination for outbound relay events.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Get the name of this publisher.
    fn name(&self) -> &'static str;

    /// Publish one event. Resolves once the bus has accepted it.
    async fn publish(&self, event: &OutboundEvent) -> Result<(), PublishError>;
}

/// Publishes to Amazon EventBridge with `PutEvents`.
pub struct EventBridgePublisher {
    client: aws_sdk_eventbridge::Client,
}

impl EventBridgePublisher {
    /// Create a publisher from an existing client.
    #[must_use]
    pub const fn new(client: aws_sdk_eventbridge::Client) -> Self {
        Self { client }
    }

    /// Create a publisher using the default AWS credential and region chain.
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;

        debug!(
            region = ?sdk_config.region(),
            "EventBridge publisher configured"
        );

        Self::new(aws_sdk_eventbridge::Client::new(&sdk_config))
    }
}

#[async_trait]
impl Publisher for EventBridgePublisher {
    fn name(&self) -> &'static str {
        "eventbridge"
    }

    async fn publish(&self, event: &OutboundEvent) -> Result<(), PublishError> {
        let entry = PutEventsRequestEntry::builder()
            .source(&event.source)
            .detail_type(&event.detail_type)
            .detail(&event.detail)
            .set_event_bus_name(event.event_bus_name.clone())
            .build();

        let output = self
            .client
            .put_events()
            .entries(entry)
            .send()
            .await
            .map_err(|e| {
                PublishError::Send(format!(
                    "{} ({}): {}",
                    e,
                    e.code().unwrap_or_default(),
                    e.message().unwrap_or_default()
                ))
            })?;

        let failed = output.failed_entry_count();
        if failed > 0 {
            let detail = output
                .entries()
                .iter()
                .filter_map(|entry| {
                    entry.error_code().map(|code| {
                        format!("{code}: {}", entry.error_message().unwrap_or_default())
                    })
                })
                .collect::<Vec<_>>()
                .join("; ");

            warn!(
                publisher = self.name(),
                failed,
                detail = %detail,
                "EventBridge rejected relay event"
            );
            return Err(PublishError::Rejected { failed, detail });
        }

        debug!(
            publisher = self.name(),
            channel = %event.channel,
            "Relay event published"
        );
        Ok(())
    }
}

/// Logs outbound events instead of sending them. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPublisher;

#[async_trait]
impl Publisher for LogPublisher {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn publish(&self, event: &OutboundEvent) -> Result<(), PublishError> {
        info!(
            publisher = self.name(),
            source = %event.source,
            detail_type = %event.detail_type,
            event_bus = event.event_bus_name.as_deref().unwrap_or("default"),
            channel = %event.channel,
            detail = %event.detail,
            "Dry run: relay event not sent"
        );
        Ok(())
    }
}
