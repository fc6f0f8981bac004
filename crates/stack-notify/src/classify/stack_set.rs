//! Stack set operation and status events.
//!
//! These are low volume, so every one is announced on the debug channel.

use super::MessageContext;
use crate::config::RelayConfig;
use crate::events::{ChangeEvent, StackSetDetail, Status};
use crate::format::{stack_set_id, stack_set_name, ConsoleKind, Palette};
use crate::message::NotificationMessage;

/// Stack set messages do not use the status palette yet.
const fn color_for_stack_set_status(_status: &Status) -> &'static str {
    Palette::Neutral.hex()
}

/// Message for a stack set event. Stack set events are never suppressed.
#[must_use]
pub fn message(
    event: &ChangeEvent,
    detail: &StackSetDetail,
    config: &RelayConfig,
) -> NotificationMessage {
    let name = stack_set_name(&detail.stack_set_arn);
    let status = &detail.status_details.status;
    // Stack instance events carry no action verb
    let change = detail
        .action()
        .map_or_else(|| status.to_string(), |action| format!("{action} {status}"));
    let summary = detail.action().map_or_else(
        || format!("Stack Set Status Change: *{status}*"),
        |action| format!("Stack Set Status Change: {action} *{status}*"),
    );

    let ctx = MessageContext::new(
        event,
        config,
        name,
        stack_set_id(&detail.stack_set_arn),
        ConsoleKind::StackSet,
    );

    let mut message = ctx.message(
        color_for_stack_set_status(status),
        &summary,
        format!(
            "{} » Stack Set {} is now {change}",
            ctx.location(),
            ctx.name()
        ),
    );
    message.channel.clone_from(&config.channels.debug);
    message
}
