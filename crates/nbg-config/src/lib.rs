//! nbgallery configuration
//!
//! Settings needed to reach a local nbgallery instance: the MySQL server
//! backing the gallery and the directory where notebook documents are cached.
//!
//! # File format
//!
//! ```toml
//! [nbgallery]
//! rails_config = "/opt/nbgallery/config/settings.yml"
//! mysql_username = "gallery"
//! mysql_password = "secret"
//! mysql_host = "127.0.0.1"
//! mysql_port = 3306
//! mysql_database = "nbgallery"
//! notebook_cache_dir = "/var/nbgallery/cache"
//! ```
//!
//! Every key is optional. When `rails_config` is set, settings missing here
//! are filled from the Rails app's YAML settings (`mysql.*` and
//! `directories.cache`).

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod rails;

pub use error::ConfigError;
pub use rails::RailsConfig;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default MySQL host when neither config names one
pub const DEFAULT_MYSQL_HOST: &str = "127.0.0.1";

/// Default MySQL port when neither config names one
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Gallery configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Path to the Rails app's YAML settings, used as a fallback source
    pub rails_config: Option<PathBuf>,
    /// MySQL user name
    pub mysql_username: Option<String>,
    /// MySQL password
    pub mysql_password: Option<String>,
    /// MySQL host
    pub mysql_host: Option<String>,
    /// MySQL port
    #[serde(deserialize_with = "rails::port")]
    pub mysql_port: Option<u16>,
    /// MySQL database name
    pub mysql_database: Option<String>,
    /// Directory holding cached notebook documents
    pub notebook_cache_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    nbgallery: GalleryConfig,
}

impl GalleryConfig {
    /// Create empty configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With notebook cache directory
    #[inline]
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.notebook_cache_dir = Some(dir.into());
        self
    }

    /// With Rails settings file
    #[inline]
    #[must_use]
    pub fn with_rails_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.rails_config = Some(path.into());
        self
    }

    /// Parse the `[nbgallery]` table of a TOML document
    ///
    /// The Rails fallback is not applied; see [`GalleryConfig::load`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse_toml(text, Path::new("<string>"))
    }

    fn parse_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file.nbgallery)
    }

    /// Load configuration from a file and apply the Rails fallback
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file (or the Rails file it names) can't be read
    /// - `ConfigError::Toml` / `ConfigError::Yaml` on syntax errors
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config = Self::parse_toml(&text, path)?.with_rails_fallback()?;
        tracing::info!("Loaded gallery config from {}", path.display());
        Ok(config)
    }

    /// Fill unset settings from the Rails settings file, if one is named
    pub fn with_rails_fallback(mut self) -> Result<Self, ConfigError> {
        let Some(rails_path) = self.rails_config.clone().filter(|p| !is_empty_path(p)) else {
            return Ok(self);
        };
        let rails = RailsConfig::load(&rails_path).map_err(|e| {
            tracing::warn!("Rails config {} unusable: {}", rails_path.display(), e);
            e
        })?;
        self.merge_rails(rails);
        Ok(self)
    }

    /// Fill unset settings from already-parsed Rails settings
    ///
    /// Values present in this config always win.
    pub fn merge_rails(&mut self, rails: RailsConfig) {
        fill(&mut self.mysql_username, rails.mysql.username);
        fill(&mut self.mysql_password, rails.mysql.password);
        fill(&mut self.mysql_host, rails.mysql.host);
        fill(&mut self.mysql_database, rails.mysql.database);
        if self.mysql_port.is_none() {
            self.mysql_port = rails.mysql.port;
        }
        if self.notebook_cache_dir.as_deref().map_or(true, is_empty_path) {
            self.notebook_cache_dir = rails.directories.cache;
        }
    }

    /// Configured notebook cache directory
    ///
    /// # Errors
    /// `ConfigError::MissingCacheDir` when unset or empty
    pub fn cache_dir(&self) -> Result<&Path, ConfigError> {
        self.notebook_cache_dir
            .as_deref()
            .filter(|p| !is_empty_path(p))
            .ok_or(ConfigError::MissingCacheDir)
    }

    /// MySQL host, defaulting to localhost
    #[must_use]
    pub fn mysql_host(&self) -> &str {
        self.mysql_host
            .as_deref()
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_MYSQL_HOST)
    }

    /// MySQL port, defaulting to 3306
    #[must_use]
    pub fn mysql_port(&self) -> u16 {
        self.mysql_port.unwrap_or(DEFAULT_MYSQL_PORT)
    }

    /// SQLAlchemy-style connection URL for the gallery database
    ///
    /// # Errors
    /// `ConfigError::MissingField` when the user name or database is unset
    pub fn mysql_url(&self) -> Result<String, ConfigError> {
        let username = non_empty(&self.mysql_username)
            .ok_or(ConfigError::MissingField("mysql_username"))?;
        let database = non_empty(&self.mysql_database)
            .ok_or(ConfigError::MissingField("mysql_database"))?;

        let mut url = format!("mysql+mysqldb://{username}");
        if let Some(password) = non_empty(&self.mysql_password) {
            url.push(':');
            url.push_str(password);
        }
        url.push_str(&format!(
            "@{}:{}/{}",
            self.mysql_host(),
            self.mysql_port(),
            database
        ));
        Ok(url)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn fill(slot: &mut Option<String>, fallback: Option<String>) {
    if non_empty(slot).is_none() {
        *slot = fallback;
    }
}

fn is_empty_path(path: &Path) -> bool {
    path.as_os_str().is_empty()
}
