//! Inbound CloudFormation change events.
//!
//! Events arrive as EventBridge envelopes. The free-text `detail-type` tag is
//! decoded once into [`EventCategory`], and the `detail` payload is decoded
//! into the matching typed struct only after the category is known.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tag marker shared by every stack-set event type.
const STACK_SET_MARKER: &str = "CloudFormation StackSet";

/// Exact tag for whole-stack status transitions.
const STACK_STATUS_TAG: &str = "CloudFormation Stack Status Change";

/// Exact tag for resource status transitions.
const RESOURCE_STATUS_TAG: &str = "CloudFormation Resource Status Change";

/// Category of an inbound event, decoded from its `detail-type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    /// Any stack-set operation or status event
    StackSet,
    /// Whole-stack status transition
    StackStatus,
    /// Single-resource status transition within a stack
    ResourceStatus,
    /// Anything else; ignored
    Unknown,
}

impl EventCategory {
    /// Decode a `detail-type` tag. Stack-set matching takes precedence.
    #[must_use]
    pub fn from_detail_type(tag: &str) -> Self {
        if tag.contains(STACK_SET_MARKER) {
            Self::StackSet
        } else if tag == STACK_STATUS_TAG {
            Self::StackStatus
        } else if tag == RESOURCE_STATUS_TAG {
            Self::ResourceStatus
        } else {
            Self::Unknown
        }
    }

    /// Short name used in log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StackSet => "stack_set",
            Self::StackStatus => "stack_status",
            Self::ResourceStatus => "resource_status",
            Self::Unknown => "unknown",
        }
    }
}

/// An EventBridge envelope carrying a CloudFormation change.
///
/// `detail` stays untyped until the category is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Event ID assigned by the bus
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Free-text type tag
    #[serde(rename = "detail-type")]
    pub detail_type: String,
    /// Emitting service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Account the change happened in
    pub account: String,
    /// Region the change happened in
    pub region: String,
    /// Event time as sent; see [`ChangeEvent::timestamp`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    /// Category-specific payload
    #[serde(default)]
    pub detail: Value,
    /// Envelope fields not modelled above, e.g. `version`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChangeEvent {
    /// Category of this event.
    #[must_use]
    pub fn category(&self) -> EventCategory {
        EventCategory::from_detail_type(&self.detail_type)
    }

    /// Event time, if present and RFC 3339.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc))
    }

    /// Decode the detail payload as `T`.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the payload does not match `T`.
    pub fn detail_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.detail)
    }
}

/// Status and optional reason shared by all detail payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StatusDetails {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
}

impl StatusDetails {
    /// The status reason, treating an empty string as absent.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.status_reason.as_deref().filter(|r| !r.is_empty())
    }
}

/// Detail of a `CloudFormation Stack Status Change` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StackDetail {
    /// Stack ARN, `arn:aws:cloudformation:<region>:<account>:stack/<name>/<uuid>`
    pub stack_id: String,
    pub status_details: StatusDetails,
}

/// Detail of a `CloudFormation Resource Status Change` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResourceDetail {
    pub stack_id: String,
    pub status_details: StatusDetails,
    /// Resource type, e.g. `AWS::S3::Bucket`
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub logical_resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
}

impl ResourceDetail {
    /// Physical ID, treating an empty string as absent.
    #[must_use]
    pub fn physical_id(&self) -> Option<&str> {
        self.physical_resource_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

/// Detail of any `CloudFormation StackSet ...` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StackSetDetail {
    /// Stack set ARN, `arn:aws:cloudformation:<region>:<account>:stackset/<name>:<uuid>`
    pub stack_set_arn: String,
    /// Operation verb, e.g. `CREATE` or `UPDATE`. Absent on stack instance events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub status_details: StatusDetails,
}

impl StackSetDetail {
    /// The action verb, treating an empty string as absent.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref().filter(|a| !a.is_empty())
    }
}

/// A CloudFormation lifecycle status.
///
/// Known stack and resource states are enumerated; anything else (stack-set
/// operation states, future additions) is kept verbatim in [`Status::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    CreateInProgress,
    CreateFailed,
    CreateComplete,
    RollbackInProgress,
    RollbackFailed,
    RollbackComplete,
    DeleteInProgress,
    DeleteFailed,
    DeleteComplete,
    DeleteSkipped,
    UpdateInProgress,
    UpdateCompleteCleanupInProgress,
    UpdateComplete,
    UpdateFailed,
    UpdateRollbackInProgress,
    UpdateRollbackFailed,
    UpdateRollbackCompleteCleanupInProgress,
    UpdateRollbackComplete,
    ReviewInProgress,
    ImportInProgress,
    ImportComplete,
    ImportRollbackInProgress,
    ImportRollbackFailed,
    ImportRollbackComplete,
    Other(String),
}

impl Status {
    /// Parse a status string. Unknown values become [`Status::Other`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "CREATE_IN_PROGRESS" => Self::CreateInProgress,
            "CREATE_FAILED" => Self::CreateFailed,
            "CREATE_COMPLETE" => Self::CreateComplete,
            "ROLLBACK_IN_PROGRESS" => Self::RollbackInProgress,
            "ROLLBACK_FAILED" => Self::RollbackFailed,
            "ROLLBACK_COMPLETE" => Self::RollbackComplete,
            "DELETE_IN_PROGRESS" => Self::DeleteInProgress,
            "DELETE_FAILED" => Self::DeleteFailed,
            "DELETE_COMPLETE" => Self::DeleteComplete,
            "DELETE_SKIPPED" => Self::DeleteSkipped,
            "UPDATE_IN_PROGRESS" => Self::UpdateInProgress,
            "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS" => Self::UpdateCompleteCleanupInProgress,
            "UPDATE_COMPLETE" => Self::UpdateComplete,
            "UPDATE_FAILED" => Self::UpdateFailed,
            "UPDATE_ROLLBACK_IN_PROGRESS" => Self::UpdateRollbackInProgress,
            "UPDATE_ROLLBACK_FAILED" => Self::UpdateRollbackFailed,
            "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS" => {
                Self::UpdateRollbackCompleteCleanupInProgress
            }
            "UPDATE_ROLLBACK_COMPLETE" => Self::UpdateRollbackComplete,
            "REVIEW_IN_PROGRESS" => Self::ReviewInProgress,
            "IMPORT_IN_PROGRESS" => Self::ImportInProgress,
            "IMPORT_COMPLETE" => Self::ImportComplete,
            "IMPORT_ROLLBACK_IN_PROGRESS" => Self::ImportRollbackInProgress,
            "IMPORT_ROLLBACK_FAILED" => Self::ImportRollbackFailed,
            "IMPORT_ROLLBACK_COMPLETE" => Self::ImportRollbackComplete,
            other => Self::Other(other.to_string()),
        }
    }

    /// The exact wire form of this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CreateInProgress => "CREATE_IN_PROGRESS",
            Self::CreateFailed => "CREATE_FAILED",
            Self::CreateComplete => "CREATE_COMPLETE",
            Self::RollbackInProgress => "ROLLBACK_IN_PROGRESS",
            Self::RollbackFailed => "ROLLBACK_FAILED",
            Self::RollbackComplete => "ROLLBACK_COMPLETE",
            Self::DeleteInProgress => "DELETE_IN_PROGRESS",
            Self::DeleteFailed => "DELETE_FAILED",
            Self::DeleteComplete => "DELETE_COMPLETE",
            Self::DeleteSkipped => "DELETE_SKIPPED",
            Self::UpdateInProgress => "UPDATE_IN_PROGRESS",
            Self::UpdateCompleteCleanupInProgress => "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
            Self::UpdateComplete => "UPDATE_COMPLETE",
            Self::UpdateFailed => "UPDATE_FAILED",
            Self::UpdateRollbackInProgress => "UPDATE_ROLLBACK_IN_PROGRESS",
            Self::UpdateRollbackFailed => "UPDATE_ROLLBACK_FAILED",
            Self::UpdateRollbackCompleteCleanupInProgress => {
                "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS"
            }
            Self::UpdateRollbackComplete => "UPDATE_ROLLBACK_COMPLETE",
            Self::ReviewInProgress => "REVIEW_IN_PROGRESS",
            Self::ImportInProgress => "IMPORT_IN_PROGRESS",
            Self::ImportComplete => "IMPORT_COMPLETE",
            Self::ImportRollbackInProgress => "IMPORT_ROLLBACK_IN_PROGRESS",
            Self::ImportRollbackFailed => "IMPORT_ROLLBACK_FAILED",
            Self::ImportRollbackComplete => "IMPORT_ROLLBACK_COMPLETE",
            Self::Other(value) => value,
        }
    }

    /// Whether this status always escalates a stack event to the debug channel.
    #[must_use]
    pub const fn is_concerning(&self) -> bool {
        matches!(
            self,
            Self::CreateFailed
                | Self::DeleteFailed
                | Self::DeleteInProgress
                | Self::RollbackComplete
                | Self::RollbackFailed
                | Self::RollbackInProgress
                | Self::UpdateFailed
                | Self::UpdateRollbackComplete
                | Self::UpdateRollbackCompleteCleanupInProgress
                | Self::UpdateRollbackFailed
                | Self::UpdateRollbackInProgress
                | Self::ImportRollbackFailed
        )
    }

    /// Whether the status name ends in `_COMPLETE`.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.as_str().ends_with("_COMPLETE")
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match Self::parse(&value) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
