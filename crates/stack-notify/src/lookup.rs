//! Human-readable nicknames for accounts and regions.
//!
//! Lookups never fail: an identifier without a nickname is shown as-is.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Display names for the public AWS regions.
const BUILTIN_REGIONS: &[(&str, &str)] = &[
    ("af-south-1", "Cape Town"),
    ("ap-east-1", "Hong Kong"),
    ("ap-northeast-1", "Tokyo"),
    ("ap-northeast-2", "Seoul"),
    ("ap-northeast-3", "Osaka"),
    ("ap-south-1", "Mumbai"),
    ("ap-south-2", "Hyderabad"),
    ("ap-southeast-1", "Singapore"),
    ("ap-southeast-2", "Sydney"),
    ("ap-southeast-3", "Jakarta"),
    ("ap-southeast-4", "Melbourne"),
    ("ca-central-1", "Canada"),
    ("ca-west-1", "Calgary"),
    ("eu-central-1", "Frankfurt"),
    ("eu-central-2", "Zurich"),
    ("eu-north-1", "Stockholm"),
    ("eu-south-1", "Milan"),
    ("eu-south-2", "Spain"),
    ("eu-west-1", "Ireland"),
    ("eu-west-2", "London"),
    ("eu-west-3", "Paris"),
    ("il-central-1", "Tel Aviv"),
    ("me-central-1", "UAE"),
    ("me-south-1", "Bahrain"),
    ("sa-east-1", "São Paulo"),
    ("us-east-1", "N. Virginia"),
    ("us-east-2", "Ohio"),
    ("us-west-1", "N. California"),
    ("us-west-2", "Oregon"),
];

/// Account and region nickname tables.
///
/// Loaded from a TOML file of the form:
///
/// ```toml
/// [accounts]
/// "123456789012" = "Production"
///
/// [regions]
/// us-east-1 = "N. Virginia"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Nicknames {
    #[serde(default)]
    accounts: HashMap<String, String>,
    #[serde(default)]
    regions: HashMap<String, String>,
}

impl Nicknames {
    /// Built-in region names and no account names.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            accounts: HashMap::new(),
            regions: BUILTIN_REGIONS
                .iter()
                .map(|(id, name)| ((*id).to_string(), (*name).to_string()))
                .collect(),
        }
    }

    /// Build tables from explicit entries.
    #[must_use]
    pub fn new(accounts: HashMap<String, String>, regions: HashMap<String, String>) -> Self {
        Self { accounts, regions }
    }

    /// Load tables from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse tables from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the input is invalid.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Overlay `other` on top of `self`; entries in `other` win.
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        self.accounts.extend(other.accounts);
        self.regions.extend(other.regions);
        self
    }

    /// Nickname for an account ID, or the ID itself.
    #[must_use]
    pub fn account<'a>(&'a self, account_id: &'a str) -> &'a str {
        self.accounts
            .get(account_id)
            .map_or(account_id, String::as_str)
    }

    /// Nickname for a region ID, or the ID itself.
    #[must_use]
    pub fn region<'a>(&'a self, region_id: &'a str) -> &'a str {
        self.regions.get(region_id).map_or(region_id, String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_ids_pass_through() {
        let nicknames = Nicknames::builtin();
        assert_eq!(nicknames.account("999999999999"), "999999999999");
        assert_eq!(nicknames.region("mars-north-1"), "mars-north-1");
        assert_eq!(nicknames.region("us-west-2"), "Oregon");
    }

    #[test]
    fn test_from_toml_and_merge() {
        let file = Nicknames::from_toml(
            r#"
            [accounts]
            "123456789012" = "Production"

            [regions]
            us-east-1 = "Virginia"
            "#,
        )
        .unwrap();

        let nicknames = Nicknames::builtin().merged(file);
        assert_eq!(nicknames.account("123456789012"), "Production");
        assert_eq!(nicknames.region("us-east-1"), "Virginia");
        assert_eq!(nicknames.region("eu-west-1"), "Ireland");
    }

    #[test]
    fn test_empty_toml_is_valid() {
        assert_eq!(Nicknames::from_toml("").unwrap(), Nicknames::default());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(Nicknames::from_toml("[accounts\n").is_err());
    }
}
