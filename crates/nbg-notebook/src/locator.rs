//! Location of cached notebook documents
//!
//! The gallery keeps one file per notebook in its cache directory, named
//! `<uuid>.<extension>` with the extension given by the notebook's format.

use crate::error::{NotebookError, NotebookResult};
use crate::formats::FormatRegistry;
use nbg_config::{ConfigError, GalleryConfig};
use std::path::{Path, PathBuf};

/// Computes cache paths for notebooks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheLocator {
    root: Option<PathBuf>,
}

impl CacheLocator {
    /// Create locator over a cache root
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Locator with no cache root; every lookup fails with a config error
    #[inline]
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { root: None }
    }

    /// Locator over the configured cache directory, if any
    #[must_use]
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            root: config.cache_dir().ok().map(Path::to_path_buf),
        }
    }

    /// Cache root
    ///
    /// # Errors
    /// `ConfigError::MissingCacheDir` when no (or an empty) root is set
    pub fn root(&self) -> Result<&Path, ConfigError> {
        self.root
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingCacheDir)
    }

    /// Cache path for a notebook
    ///
    /// The UUID must be a single file name component: empty UUIDs and
    /// UUIDs containing `/`, `\` or NUL are rejected, so the path never
    /// leaves the cache root. Checks run root, UUID, then notebook type,
    /// and no file system access happens here.
    ///
    /// # Errors
    /// - `NotebookError::Config` when no cache root is configured
    /// - `NotebookError::InvalidUuid` for a UUID that is not a file name
    /// - `NotebookError::UnsupportedFormat` for an unknown notebook type
    pub fn path_for(
        &self,
        uuid: &str,
        notebook_type: &str,
        registry: &FormatRegistry,
    ) -> NotebookResult<PathBuf> {
        let root = self.root()?;
        if !is_file_name(uuid) {
            return Err(NotebookError::InvalidUuid(uuid.to_string()));
        }
        let extension = registry.type_to_extension(notebook_type)?;
        Ok(root.join(format!("{uuid}.{extension}")))
    }
}

fn is_file_name(uuid: &str) -> bool {
    !uuid.is_empty() && !uuid.contains(|c: char| matches!(c, '/' | '\\' | '\0'))
}

impl From<&GalleryConfig> for CacheLocator {
    fn from(config: &GalleryConfig) -> Self {
        Self::from_config(config)
    }
}
