//! CloudFormation change notifications for chat.
//!
//! This crate receives CloudFormation stack, resource, and stack set change
//! events and turns the interesting ones into chat messages. It does not
//! deliver messages itself: each message is published as one event to a
//! downstream relay bus, which handles delivery.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use stack_notify::{ChangeEvent, LogPublisher, Relay, RelayConfig};
//!
//! # async fn run(event: ChangeEvent) -> Result<(), Box<dyn std::error::Error>> {
//! let relay = Relay::new(Arc::new(RelayConfig::from_env()?), Arc::new(LogPublisher));
//! relay.handle(&event).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! See [`RelayConfig::from_env`]. All settings default to the production
//! deployment values; `STACK_NOTIFY_NICKNAMES_FILE` points at a TOML file of
//! account and region nicknames.
//!
//! # Architecture
//!
//! - [`events`] decodes the inbound envelope into an [`EventCategory`]
//! - [`classify`] decides whether, where, and what to notify
//! - [`Publisher`] hands the message to the relay bus
//! - [`Relay`] ties the three together for one invocation

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod lookup;
pub mod message;
pub mod publish;
pub mod relay;
pub mod server;

pub use classify::{classify, Classification};
pub use config::RelayConfig;
pub use error::{ConfigError, PublishError, RelayError};
pub use events::{ChangeEvent, EventCategory, Status};
pub use format::{color_for_status, Palette};
pub use lookup::Nicknames;
pub use message::NotificationMessage;
pub use publish::{EventBridgePublisher, LogPublisher, OutboundEvent, Publisher};
pub use relay::{Outcome, Relay};
