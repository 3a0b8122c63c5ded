//! Error types for gallery configuration

use std::path::PathBuf;

/// Errors raised while loading or querying gallery configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading config {path}: {source}")]
    Io {
        /// Config file being read
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// Gallery config is not valid TOML
    #[error("invalid gallery config {path}: {source}")]
    Toml {
        /// Gallery config file
        path: PathBuf,
        /// TOML decode failure
        #[source]
        source: toml::de::Error,
    },

    /// Rails config is not valid YAML
    #[error("invalid rails config {path}: {source}")]
    Yaml {
        /// Rails config file
        path: PathBuf,
        /// YAML decode failure
        #[source]
        source: serde_yaml::Error,
    },

    /// No notebook cache directory configured
    #[error("notebook_cache_dir must be set in config")]
    MissingCacheDir,

    /// A setting required by the requested operation is unset
    #[error("{0} must be set in config")]
    MissingField(&'static str),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
