//! Stack and resource status changes.
//!
//! Both event types start on the default channel and are either escalated
//! by a routing rule or dropped. Stack events escalate on concerning and
//! terminal statuses. Resource events do not: resource-level terminal states
//! are too noisy, so only `DELETE_SKIPPED` and noteworthy reasons surface.

use tracing::debug;

use super::MessageContext;
use crate::config::RelayConfig;
use crate::events::{ChangeEvent, ResourceDetail, StackDetail, Status};
use crate::format::{color_for_status, stack_name, ConsoleKind};
use crate::message::NotificationMessage;

/// Reasons attached to routine operations. Matched exactly.
pub const BOILERPLATE_REASONS: &[&str] = &[
    "User Initiated",
    "Transformation succeeded",
    "Resource creation Initiated",
    "Requested update required the provider to create a new physical resource",
    "Requested update requires the creation of a new physical resource; hence creating one.",
];

/// Whether a status reason carries information beyond routine boilerplate.
#[must_use]
pub fn is_noteworthy_reason(reason: &str) -> bool {
    !BOILERPLATE_REASONS.contains(&reason)
}

fn quoted(reason: &str) -> String {
    format!("> {reason}")
}

/// Message for a whole-stack status change, or `None` to stay quiet.
#[must_use]
pub fn stack_message(
    event: &ChangeEvent,
    detail: &StackDetail,
    config: &RelayConfig,
) -> Option<NotificationMessage> {
    let name = stack_name(&detail.stack_id);
    let status = &detail.status_details.status;
    let reason = detail.status_details.reason();

    // Root deployment stacks update on every pipeline run
    if *status == Status::UpdateComplete && name.starts_with(&config.root_stack_prefix) {
        debug!(stack = name, "Suppressing root stack UPDATE_COMPLETE");
        return None;
    }

    let ctx = MessageContext::new(event, config, name, &detail.stack_id, ConsoleKind::Stack);
    let build = |body: Option<String>| {
        let mut message = ctx.message(
            color_for_status(status),
            &format!("Stack Status Change: *{status}*"),
            format!("{} » Stack {} is now {status}", ctx.location(), ctx.name()),
        );
        message.channel.clone_from(&config.channels.debug);
        message.body = body;
        message
    };

    if status.is_concerning() || status.is_complete() {
        return Some(build(reason.map(quoted)));
    }

    match reason {
        Some(reason) if is_noteworthy_reason(reason) => Some(build(Some(quoted(reason)))),
        _ => {
            debug!(stack = name, status = %status, "No routing rule matched stack event");
            None
        }
    }
}

/// Message for a resource status change, or `None` to stay quiet.
#[must_use]
pub fn resource_message(
    event: &ChangeEvent,
    detail: &ResourceDetail,
    config: &RelayConfig,
) -> Option<NotificationMessage> {
    let name = stack_name(&detail.stack_id);
    let status = &detail.status_details.status;

    let summary = if detail.resource_type.is_empty() {
        format!("Resource Status Change: *{status}*")
    } else {
        format!(
            "Resource Status Change: *{status}* for `{}`",
            detail.resource_type
        )
    };
    let resource = [
        detail.resource_type.as_str(),
        detail.logical_resource_id.as_str(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");
    let resource = if resource.is_empty() {
        "Resource"
    } else {
        resource.as_str()
    };

    let ctx = MessageContext::new(event, config, name, &detail.stack_id, ConsoleKind::Stack);
    let build = |channel: &str, body: String| {
        let mut message = ctx.message(
            color_for_status(status),
            &summary,
            format!(
                "{} » {resource} in {} is now {status}",
                ctx.location(),
                ctx.name()
            ),
        );
        message.channel = channel.to_string();
        message.body = Some(body);
        message
    };

    // Retained resources are tracked separately so they can be cleaned up
    if *status == Status::DeleteSkipped {
        let body = detail.physical_id().map_or_else(
            || "No physical ID".to_string(),
            |id| format!("Physical ID: `{id}`"),
        );
        return Some(build(&config.channels.cleanup, body));
    }

    match detail.status_details.reason() {
        Some(reason) if is_noteworthy_reason(reason) => {
            Some(build(&config.channels.debug, quoted(reason)))
        }
        _ => {
            debug!(
                stack = name,
                resource = %detail.logical_resource_id,
                status = %status,
                "No routing rule matched resource event"
            );
            None
        }
    }
}
