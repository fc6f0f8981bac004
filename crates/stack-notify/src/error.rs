//! Error types for the notification relay.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when publishing a message to the relay bus.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The `PutEvents` call itself failed
    #[error("PutEvents request failed: {0}")]
    Send(String),

    /// The bus accepted the request but rejected the entry
    #[error("Event bus rejected {failed} of the submitted entries: {detail}")]
    Rejected { failed: i32, detail: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nickname file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Nickname file is not valid TOML
    #[error("Invalid nickname file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors that fail a relay invocation.
///
/// Everything that is not a publish failure is handled as a silent no-op,
/// so this is the only way an invocation can fail.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Publishing the formatted message failed
    #[error("Failed to publish notification: {0}")]
    Publish(#[from] PublishError),
}
