//! Event classification: decides whether an event produces a message, where
//! it goes, and what it says.
//!
//! Classification is a pure function of the event and the configuration.
//! Stack-set events go through [`stack_set`]; stack and resource status
//! events share [`stack_change`], which keeps a separate rule chain for each.

pub mod stack_change;
pub mod stack_set;

use tracing::warn;

use crate::config::RelayConfig;
use crate::events::{ChangeEvent, EventCategory, ResourceDetail, StackDetail, StackSetDetail};
use crate::format::{console_url, deep_link, ConsoleKind};
use crate::message::NotificationMessage;

/// Result of classifying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A message should be published
    Notify(NotificationMessage),
    /// A recognised event that routing rules chose not to announce
    Suppressed,
    /// Unknown event type or malformed detail
    Ignored,
}

impl Classification {
    /// The message, if any.
    #[must_use]
    pub fn into_message(self) -> Option<NotificationMessage> {
        match self {
            Self::Notify(message) => Some(message),
            Self::Suppressed | Self::Ignored => None,
        }
    }

    fn from_option(message: Option<NotificationMessage>) -> Self {
        message.map_or(Self::Suppressed, Self::Notify)
    }
}

/// Classify an event by its category.
#[must_use]
pub fn classify(event: &ChangeEvent, config: &RelayConfig) -> Classification {
    let category = event.category();

    match category {
        EventCategory::StackSet => match event.detail_as::<StackSetDetail>() {
            Ok(detail) => Classification::Notify(stack_set::message(event, &detail, config)),
            Err(e) => malformed(event, category, &e),
        },
        EventCategory::StackStatus => match event.detail_as::<StackDetail>() {
            Ok(detail) => {
                Classification::from_option(stack_change::stack_message(event, &detail, config))
            }
            Err(e) => malformed(event, category, &e),
        },
        EventCategory::ResourceStatus => match event.detail_as::<ResourceDetail>() {
            Ok(detail) => Classification::from_option(stack_change::resource_message(
                event, &detail, config,
            )),
            Err(e) => malformed(event, category, &e),
        },
        EventCategory::Unknown => Classification::Ignored,
    }
}

fn malformed(
    event: &ChangeEvent,
    category: EventCategory,
    error: &serde_json::Error,
) -> Classification {
    warn!(
        category = category.as_str(),
        detail_type = %event.detail_type,
        error = %error,
        "Ignoring event with malformed detail"
    );
    Classification::Ignored
}

/// Pieces common to every message: linked title and routing defaults.
pub(crate) struct MessageContext<'a> {
    config: &'a RelayConfig,
    /// `<account nickname> - <region nickname>`
    location: String,
    name: &'a str,
    link: String,
}

impl<'a> MessageContext<'a> {
    pub(crate) fn new(
        event: &'a ChangeEvent,
        config: &'a RelayConfig,
        name: &'a str,
        console_id: &str,
        kind: ConsoleKind,
    ) -> Self {
        let destination = console_url(&event.region, console_id, kind);
        let link = deep_link(&config.deep_link, &event.account, &destination);
        let location = format!(
            "{} - {}",
            config.nicknames.account(&event.account),
            config.nicknames.region(&event.region)
        );

        Self {
            config,
            location,
            name,
            link,
        }
    }

    /// `<account> - <region>` prefix used in fallback text.
    pub(crate) fn location(&self) -> &str {
        &self.location
    }

    pub(crate) fn name(&self) -> &str {
        self.name
    }

    /// Build a message on the default channel with a two-line header.
    pub(crate) fn message(
        &self,
        color: &str,
        summary_line: &str,
        fallback: String,
    ) -> NotificationMessage {
        let header = format!(
            "*<{}|{} » {}>*\n{summary_line}",
            self.link, self.location, self.name
        );

        NotificationMessage {
            username: self.config.username.clone(),
            icon: self.config.icon.clone(),
            channel: self.config.channels.default.clone(),
            color: color.to_string(),
            fallback,
            header,
            body: None,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::json;

    use crate::events::ChangeEvent;

    pub const ACCOUNT: &str = "123456789012";
    pub const REGION: &str = "us-east-1";
    pub const STACK_ID: &str =
        "arn:aws:cloudformation:us-east-1:123456789012:stack/web-prod/5b1c2d30-aaaa-11ee-9c7e-0a1b2c3d4e5f";

    pub fn stack_event(status: &str, reason: Option<&str>) -> ChangeEvent {
        stack_event_for(STACK_ID, status, reason)
    }

    pub fn stack_event_for(stack_id: &str, status: &str, reason: Option<&str>) -> ChangeEvent {
        let mut details = json!({ "status": status });
        if let Some(reason) = reason {
            details["status-reason"] = json!(reason);
        }
        serde_json::from_value(json!({
            "detail-type": "CloudFormation Stack Status Change",
            "source": "aws.cloudformation",
            "account": ACCOUNT,
            "region": REGION,
            "detail": {
                "stack-id": stack_id,
                "status-details": details,
            }
        }))
        .unwrap()
    }

    pub fn resource_event(
        status: &str,
        reason: Option<&str>,
        physical_id: Option<&str>,
    ) -> ChangeEvent {
        let mut details = json!({ "status": status });
        if let Some(reason) = reason {
            details["status-reason"] = json!(reason);
        }
        let mut detail = json!({
            "stack-id": STACK_ID,
            "logical-resource-id": "AssetsBucket",
            "resource-type": "AWS::S3::Bucket",
            "status-details": details,
        });
        if let Some(id) = physical_id {
            detail["physical-resource-id"] = json!(id);
        }
        serde_json::from_value(json!({
            "detail-type": "CloudFormation Resource Status Change",
            "source": "aws.cloudformation",
            "account": ACCOUNT,
            "region": REGION,
            "detail": detail,
        }))
        .unwrap()
    }

    pub fn stack_set_event(action: &str, status: &str) -> ChangeEvent {
        serde_json::from_value(json!({
            "detail-type": "CloudFormation StackSet Operation Status Change",
            "source": "aws.cloudformation",
            "account": ACCOUNT,
            "region": REGION,
            "detail": {
                "stack-set-arn": "arn:aws:cloudformation:us-east-1:123456789012:stackset/org-baseline:6d1e4f2a-1111-2222-3333-444455556666",
                "action": action,
                "status-details": { "status": status }
            }
        }))
        .unwrap()
    }
}
