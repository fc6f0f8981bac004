//! Shared formatting helpers: status colors, console links, and identifier
//! parsing.

use crate::config::DeepLinkConfig;
use crate::events::Status;

/// Attachment color buckets. These match the CloudFormation console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// Successful completion
    Green,
    /// In progress
    Yellow,
    /// Failure, or rolling back after a failed update
    Red,
    /// Deleted
    Grey,
    /// Anything else
    Neutral,
}

impl Palette {
    /// Bucket for a status.
    #[must_use]
    pub const fn for_status(status: &Status) -> Self {
        match status {
            Status::CreateComplete
            | Status::RollbackComplete
            | Status::UpdateComplete
            | Status::UpdateRollbackComplete => Self::Green,

            Status::CreateInProgress
            | Status::DeleteInProgress
            | Status::ReviewInProgress
            | Status::RollbackInProgress
            | Status::UpdateInProgress
            | Status::UpdateCompleteCleanupInProgress => Self::Yellow,

            Status::CreateFailed
            | Status::DeleteFailed
            | Status::UpdateFailed
            | Status::RollbackFailed
            | Status::UpdateRollbackFailed
            | Status::UpdateRollbackInProgress
            | Status::UpdateRollbackCompleteCleanupInProgress => Self::Red,

            Status::DeleteComplete => Self::Grey,

            _ => Self::Neutral,
        }
    }

    /// Hex color for this bucket.
    #[must_use]
    pub const fn hex(&self) -> &'static str {
        match self {
            Self::Green => "#2eb886",
            Self::Yellow => "#f4f323",
            Self::Red => "#a30200",
            Self::Grey => "#AAAAAA",
            Self::Neutral => "#000000",
        }
    }
}

/// Hex attachment color for a status.
#[must_use]
pub const fn color_for_status(status: &Status) -> &'static str {
    Palette::for_status(status).hex()
}

/// What a console link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleKind {
    /// A stack, addressed by its full stack ARN
    Stack,
    /// A stack set, addressed by its `name:uuid` ID
    StackSet,
}

/// Direct CloudFormation console URL for a stack or stack set.
#[must_use]
pub fn console_url(region: &str, id: &str, kind: ConsoleKind) -> String {
    let base =
        format!("https://{region}.console.aws.amazon.com/cloudformation/home?region={region}");
    match kind {
        ConsoleKind::Stack => format!("{base}#/stacks/stackinfo?stackId={id}"),
        ConsoleKind::StackSet => format!("{base}#/stacksets/{id}/info"),
    }
}

/// SSO portal URL that assumes the configured role in `account` and then
/// redirects to `destination`.
#[must_use]
pub fn deep_link(config: &DeepLinkConfig, account: &str, destination: &str) -> String {
    format!(
        "{}/#/console?account_id={account}&role_name={}&destination={}",
        config.sso_start_url,
        config.role_name,
        urlencoding::encode(destination)
    )
}

/// Stack name from a stack ARN (`...:stack/<name>/<uuid>`).
///
/// Returns the input unchanged if it is not shaped like a stack ARN.
#[must_use]
pub fn stack_name(stack_id: &str) -> &str {
    stack_id
        .split_once(":stack/")
        .and_then(|(_, rest)| rest.split('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or(stack_id)
}

/// Stack set ID (`<name>:<uuid>`) from a stack set ARN.
///
/// Returns the input unchanged if it is not shaped like a stack set ARN.
#[must_use]
pub fn stack_set_id(stack_set_arn: &str) -> &str {
    stack_set_arn
        .split_once("stackset/")
        .map(|(_, id)| id)
        .filter(|id| !id.is_empty())
        .unwrap_or(stack_set_arn)
}

/// Stack set name: the part of the stack set ID before the first `:`.
#[must_use]
pub fn stack_set_name(stack_set_arn: &str) -> &str {
    let id = stack_set_id(stack_set_arn);
    id.split(':').next().unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_ROLE_NAME, DEFAULT_SSO_START_URL};

    #[test]
    fn test_color_buckets() {
        let cases = [
            ("CREATE_COMPLETE", "#2eb886"),
            ("ROLLBACK_COMPLETE", "#2eb886"),
            ("UPDATE_COMPLETE", "#2eb886"),
            ("UPDATE_ROLLBACK_COMPLETE", "#2eb886"),
            ("CREATE_IN_PROGRESS", "#f4f323"),
            ("DELETE_IN_PROGRESS", "#f4f323"),
            ("REVIEW_IN_PROGRESS", "#f4f323"),
            ("ROLLBACK_IN_PROGRESS", "#f4f323"),
            ("UPDATE_IN_PROGRESS", "#f4f323"),
            ("UPDATE_COMPLETE_CLEANUP_IN_PROGRESS", "#f4f323"),
            ("CREATE_FAILED", "#a30200"),
            ("DELETE_FAILED", "#a30200"),
            ("UPDATE_FAILED", "#a30200"),
            ("ROLLBACK_FAILED", "#a30200"),
            ("UPDATE_ROLLBACK_FAILED", "#a30200"),
            ("UPDATE_ROLLBACK_IN_PROGRESS", "#a30200"),
            ("UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS", "#a30200"),
            ("DELETE_COMPLETE", "#AAAAAA"),
        ];
        for (status, hex) in cases {
            assert_eq!(color_for_status(&Status::parse(status)), hex, "{status}");
        }
    }

    #[test]
    fn test_unlisted_statuses_are_neutral() {
        for status in ["DELETE_SKIPPED", "IMPORT_ROLLBACK_FAILED", "SUCCEEDED", ""] {
            assert_eq!(color_for_status(&Status::parse(status)), "#000000", "{status}");
        }
    }

    #[test]
    fn test_console_urls() {
        assert_eq!(
            console_url(
                "us-east-1",
                "arn:aws:cloudformation:us-east-1:123456789012:stack/web/abc",
                ConsoleKind::Stack
            ),
            "https://us-east-1.console.aws.amazon.com/cloudformation/home?region=us-east-1\
             #/stacks/stackinfo?stackId=arn:aws:cloudformation:us-east-1:123456789012:stack/web/abc"
        );
        assert_eq!(
            console_url("eu-west-1", "baseline:1234-abcd", ConsoleKind::StackSet),
            "https://eu-west-1.console.aws.amazon.com/cloudformation/home?region=eu-west-1\
             #/stacksets/baseline:1234-abcd/info"
        );
    }

    #[test]
    fn test_deep_link_escapes_destination() {
        let config = DeepLinkConfig {
            sso_start_url: DEFAULT_SSO_START_URL.to_string(),
            role_name: DEFAULT_ROLE_NAME.to_string(),
        };
        let link = deep_link(
            &config,
            "123456789012",
            "https://us-east-1.console.aws.amazon.com/cloudformation/home?region=us-east-1#/stacks",
        );
        assert_eq!(
            link,
            "https://d-906713e952.awsapps.com/start/#/console?account_id=123456789012\
             &role_name=AdministratorAccess\
             &destination=https%3A%2F%2Fus-east-1.console.aws.amazon.com%2Fcloudformation\
             %2Fhome%3Fregion%3Dus-east-1%23%2Fstacks"
        );
    }

    #[test]
    fn test_stack_name_parsing() {
        assert_eq!(
            stack_name("arn:aws:cloudformation:us-east-1:123456789012:stack/web-prod/9a1b-22"),
            "web-prod"
        );
        assert_eq!(stack_name("not-an-arn"), "not-an-arn");
    }

    #[test]
    fn test_stack_set_parsing() {
        let arn = "arn:aws:cloudformation:us-east-1:123456789012:stackset/org-baseline:6d1e-4f2a";
        assert_eq!(stack_set_id(arn), "org-baseline:6d1e-4f2a");
        assert_eq!(stack_set_name(arn), "org-baseline");
        assert_eq!(stack_set_name("plain"), "plain");
    }
}
