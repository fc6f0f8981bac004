//! Chat messages handed to the downstream relay.

use serde::{Serialize, Serializer};

/// A formatted chat message for one change event.
///
/// Built fresh per event and serialized into the relay's attachment/blocks
/// payload; see [`NotificationMessage::payload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// Bot display name
    pub username: String,
    /// Bot icon emoji, e.g. `:ops-cloudformation:`
    pub icon: String,
    /// Destination channel ID or name
    pub channel: String,
    /// Attachment color as a hex string
    pub color: String,
    /// Plain-text summary for notifications and clients without block support
    pub fallback: String,
    /// Markdown header, always present
    pub header: String,
    /// Optional markdown body line
    pub body: Option<String>,
}

impl NotificationMessage {
    /// Build the relay payload for this message.
    #[must_use]
    pub fn payload(&self) -> RelayPayload<'_> {
        let mut blocks = vec![Block::markdown(&self.header)];
        if let Some(body) = &self.body {
            blocks.push(Block::markdown(body));
        }

        RelayPayload {
            username: &self.username,
            icon_emoji: &self.icon,
            channel: &self.channel,
            attachments: vec![Attachment {
                color: &self.color,
                fallback: &self.fallback,
                blocks,
            }],
        }
    }

    /// Serialize the relay payload as a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for NotificationMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload().serialize(serializer)
    }
}

// =============================================================================
// Relay API types
// =============================================================================

/// Message body understood by the chat relay.
#[derive(Debug, Serialize)]
pub struct RelayPayload<'a> {
    username: &'a str,
    icon_emoji: &'a str,
    channel: &'a str,
    attachments: Vec<Attachment<'a>>,
}

#[derive(Debug, Serialize)]
struct Attachment<'a> {
    color: &'a str,
    fallback: &'a str,
    blocks: Vec<Block<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Block<'a> {
    Section { text: Text<'a> },
}

impl<'a> Block<'a> {
    fn markdown(text: &'a str) -> Self {
        Self::Section {
            text: Text::Mrkdwn { text },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Text<'a> {
    Mrkdwn { text: &'a str },
}
