//! Relay configuration.
//!
//! Every value has a default matching the production deployment, so an
//! unconfigured process behaves exactly like the deployed relay. Values can
//! be overridden through `STACK_NOTIFY_*` environment variables.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ConfigError;
use crate::lookup::Nicknames;

/// `#ops-debug`
pub const DEFAULT_DEBUG_CHANNEL: &str = "G2QHC11SM";
/// `#ops-delete-skipped`
pub const DEFAULT_CLEANUP_CHANNEL: &str = "C0358B7NE9W";
pub const DEFAULT_CHANNEL: &str = "#sandbox2";
pub const DEFAULT_USERNAME: &str = "AWS CloudFormation";
pub const DEFAULT_ICON: &str = ":ops-cloudformation:";
pub const DEFAULT_SSO_START_URL: &str = "https://d-906713e952.awsapps.com/start";
pub const DEFAULT_ROLE_NAME: &str = "AdministratorAccess";
pub const DEFAULT_ROOT_STACK_PREFIX: &str = "infrastructure-cd-root-";
pub const DEFAULT_EVENT_SOURCE: &str = "org.prx.cloudformation-notifications";
pub const DEFAULT_DETAIL_TYPE: &str = "Slack Message Relay Message Payload";

const ENV_DEBUG_CHANNEL: &str = "STACK_NOTIFY_DEBUG_CHANNEL";
const ENV_CLEANUP_CHANNEL: &str = "STACK_NOTIFY_CLEANUP_CHANNEL";
const ENV_DEFAULT_CHANNEL: &str = "STACK_NOTIFY_DEFAULT_CHANNEL";
const ENV_USERNAME: &str = "STACK_NOTIFY_USERNAME";
const ENV_ICON: &str = "STACK_NOTIFY_ICON";
const ENV_SSO_START_URL: &str = "STACK_NOTIFY_SSO_START_URL";
const ENV_ROLE_NAME: &str = "STACK_NOTIFY_ROLE_NAME";
const ENV_ROOT_STACK_PREFIX: &str = "STACK_NOTIFY_ROOT_STACK_PREFIX";
const ENV_EVENT_SOURCE: &str = "STACK_NOTIFY_EVENT_SOURCE";
const ENV_DETAIL_TYPE: &str = "STACK_NOTIFY_DETAIL_TYPE";
const ENV_EVENT_BUS: &str = "STACK_NOTIFY_EVENT_BUS";
const ENV_NICKNAMES_FILE: &str = "STACK_NOTIFY_NICKNAMES_FILE";

/// Destination channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channels {
    /// Escalations and all stack-set events
    pub debug: String,
    /// `DELETE_SKIPPED` resources awaiting manual cleanup
    pub cleanup: String,
    /// Starting channel before any routing rule applies
    pub default: String,
}

/// Console deep-link settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLinkConfig {
    /// SSO portal start URL, without a trailing slash
    pub sso_start_url: String,
    /// Role assumed when following a link
    pub role_name: String,
}

/// Identity of the events published to the relay bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundConfig {
    pub source: String,
    pub detail_type: String,
    /// Target bus; the account default bus when unset
    pub event_bus_name: Option<String>,
}

/// Full relay configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub channels: Channels,
    pub username: String,
    pub icon: String,
    pub deep_link: DeepLinkConfig,
    /// Stacks with this prefix do not notify on `UPDATE_COMPLETE`
    pub root_stack_prefix: String,
    pub outbound: OutboundConfig,
    pub nicknames: Nicknames,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            channels: Channels {
                debug: DEFAULT_DEBUG_CHANNEL.to_string(),
                cleanup: DEFAULT_CLEANUP_CHANNEL.to_string(),
                default: DEFAULT_CHANNEL.to_string(),
            },
            username: DEFAULT_USERNAME.to_string(),
            icon: DEFAULT_ICON.to_string(),
            deep_link: DeepLinkConfig {
                sso_start_url: DEFAULT_SSO_START_URL.to_string(),
                role_name: DEFAULT_ROLE_NAME.to_string(),
            },
            root_stack_prefix: DEFAULT_ROOT_STACK_PREFIX.to_string(),
            outbound: OutboundConfig {
                source: DEFAULT_EVENT_SOURCE.to_string(),
                detail_type: DEFAULT_DETAIL_TYPE.to_string(),
                event_bus_name: None,
            },
            nicknames: Nicknames::builtin(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `STACK_NOTIFY_NICKNAMES_FILE` is set but the file
    /// cannot be read or parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the nickname file cannot be loaded.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let nicknames = match get(ENV_NICKNAMES_FILE) {
            Some(path) => {
                let path = PathBuf::from(path);
                info!(path = %path.display(), "Loading nickname tables");
                Nicknames::builtin().merged(Nicknames::from_file(&path)?)
            }
            None => {
                debug!("No nickname file configured, using built-in region names");
                defaults.nicknames
            }
        };

        Ok(Self {
            channels: Channels {
                debug: get(ENV_DEBUG_CHANNEL).unwrap_or(defaults.channels.debug),
                cleanup: get(ENV_CLEANUP_CHANNEL).unwrap_or(defaults.channels.cleanup),
                default: get(ENV_DEFAULT_CHANNEL).unwrap_or(defaults.channels.default),
            },
            username: get(ENV_USERNAME).unwrap_or(defaults.username),
            icon: get(ENV_ICON).unwrap_or(defaults.icon),
            deep_link: DeepLinkConfig {
                sso_start_url: get(ENV_SSO_START_URL)
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.deep_link.sso_start_url),
                role_name: get(ENV_ROLE_NAME).unwrap_or(defaults.deep_link.role_name),
            },
            root_stack_prefix: get(ENV_ROOT_STACK_PREFIX).unwrap_or(defaults.root_stack_prefix),
            outbound: OutboundConfig {
                source: get(ENV_EVENT_SOURCE).unwrap_or(defaults.outbound.source),
                detail_type: get(ENV_DETAIL_TYPE).unwrap_or(defaults.outbound.detail_type),
                event_bus_name: get(ENV_EVENT_BUS),
            },
            nicknames,
        })
    }

    /// Replace the nickname tables with those from `path`, on top of the
    /// built-in region names.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded.
    pub fn with_nicknames_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        self.nicknames = Nicknames::builtin().merged(Nicknames::from_file(path)?);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = RelayConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.channels.debug, "G2QHC11SM");
        assert_eq!(config.channels.cleanup, "C0358B7NE9W");
        assert_eq!(config.channels.default, "#sandbox2");
        assert_eq!(config.username, "AWS CloudFormation");
        assert_eq!(config.icon, ":ops-cloudformation:");
        assert_eq!(config.deep_link.role_name, "AdministratorAccess");
        assert_eq!(config.outbound.source, "org.prx.cloudformation-notifications");
        assert_eq!(config.outbound.detail_type, "Slack Message Relay Message Payload");
        assert_eq!(config.outbound.event_bus_name, None);
    }

    #[test]
    fn test_overrides_and_empty_values() {
        let config = RelayConfig::from_lookup(lookup_from(&[
            ("STACK_NOTIFY_DEBUG_CHANNEL", "C123"),
            ("STACK_NOTIFY_SSO_START_URL", "https://sso.example.com/start/"),
            ("STACK_NOTIFY_EVENT_BUS", "relay-bus"),
            ("STACK_NOTIFY_ICON", ""),
        ]))
        .unwrap();

        assert_eq!(config.channels.debug, "C123");
        assert_eq!(config.deep_link.sso_start_url, "https://sso.example.com/start");
        assert_eq!(config.outbound.event_bus_name.as_deref(), Some("relay-bus"));
        assert_eq!(config.icon, DEFAULT_ICON);
    }

    #[test]
    fn test_nickname_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[accounts]\n\"123456789012\" = \"prod\"").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let config =
            RelayConfig::from_lookup(lookup_from(&[("STACK_NOTIFY_NICKNAMES_FILE", path.as_str())]))
                .unwrap();

        assert_eq!(config.nicknames.account("123456789012"), "prod");
        // Built-in region names survive a file without a [regions] table
        assert_eq!(config.nicknames.region("us-east-1"), "N. Virginia");
    }

    #[test]
    fn test_missing_nickname_file_is_an_error() {
        let result = RelayConfig::from_lookup(lookup_from(&[(
            "STACK_NOTIFY_NICKNAMES_FILE",
            "/nonexistent/nicknames.toml",
        )]));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
