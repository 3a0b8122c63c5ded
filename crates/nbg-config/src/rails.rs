//! Settings borrowed from the gallery's Rails application config
//!
//! The Rails app keeps its own YAML settings file. When the gallery config
//! points at it, database and cache settings the gallery config leaves unset
//! are taken from there.

use crate::error::ConfigError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Subset of the Rails settings file this crate understands
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RailsConfig {
    /// `mysql:` section
    pub mysql: RailsMysql,
    /// `directories:` section
    pub directories: RailsDirectories,
}

/// Database settings from the Rails config
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RailsMysql {
    /// Database user
    pub username: Option<String>,
    /// Database password
    pub password: Option<String>,
    /// Database server host
    pub host: Option<String>,
    /// Database server port, integer or numeric string
    #[serde(deserialize_with = "port")]
    pub port: Option<u16>,
    /// Database name
    pub database: Option<String>,
}

/// Directory settings from the Rails config
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RailsDirectories {
    /// Notebook cache directory
    pub cache: Option<PathBuf>,
}

impl RailsConfig {
    /// Parse Rails settings from YAML text
    ///
    /// `path` is only used for error reporting.
    pub fn from_yaml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        // An empty settings file deserializes as unit, not as a mapping
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse a Rails settings file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        Self::from_yaml_str(&text, path)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortValue {
    Number(u16),
    Text(String),
}

/// Accept a port written either as an integer or as a string
pub(crate) fn port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<PortValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PortValue::Number(n)) => Ok(Some(n)),
        Some(PortValue::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(PortValue::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid port '{s}'"))),
    }
}
