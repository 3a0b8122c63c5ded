//! Notebook resolution - main entry point
//!
//! Turns whatever identifies a notebook into a parsed document:
//! - a gallery database record
//! - a gallery UUID plus notebook type
//! - a file path, with the type given or inferred from the extension
//! - raw text plus notebook type
//!
//! ```text
//! Record → UUID → CacheLocator → File → Text → FormatRegistry → NotebookDocument
//! ```

use crate::document::NotebookDocument;
use crate::error::{NotebookError, NotebookResult};
use crate::formats::{default_formats, FormatRegistry, NotebookFormat, DEFAULT_NOTEBOOK_TYPE};
use crate::locator::CacheLocator;
use nbg_config::GalleryConfig;
use std::path::{Path, PathBuf};

/// A gallery notebook row, as supplied by the database layer
///
/// Only the UUID is used here.
pub trait NotebookRecord {
    /// Stable notebook UUID
    fn uuid(&self) -> &str;
}

impl<R: NotebookRecord + ?Sized> NotebookRecord for &R {
    fn uuid(&self) -> &str {
        (**self).uuid()
    }
}

/// Anything a notebook can be resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotebookSource {
    /// Gallery record, stored in the default format
    Record {
        /// Notebook UUID
        uuid: String,
    },
    /// Gallery UUID with explicit type
    Uuid {
        /// Notebook UUID
        uuid: String,
        /// Format tag
        notebook_type: String,
    },
    /// File on disk
    File {
        /// Path to read
        path: PathBuf,
        /// Format tag; inferred from the extension when `None`
        notebook_type: Option<String>,
    },
    /// Raw notebook text
    Text {
        /// Document text
        text: String,
        /// Format tag
        notebook_type: String,
    },
}

impl NotebookSource {
    /// Source for a database record
    pub fn record<R: NotebookRecord + ?Sized>(record: &R) -> Self {
        Self::Record {
            uuid: record.uuid().to_string(),
        }
    }

    /// Source for a cached notebook
    pub fn uuid(uuid: impl Into<String>, notebook_type: impl Into<String>) -> Self {
        Self::Uuid {
            uuid: uuid.into(),
            notebook_type: notebook_type.into(),
        }
    }

    /// Source for a file, inferring its type
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            notebook_type: None,
        }
    }

    /// Source for notebook text
    pub fn text(text: impl Into<String>, notebook_type: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            notebook_type: notebook_type.into(),
        }
    }
}

/// Resolves notebook identifiers into documents
///
/// Holds only immutable lookup tables; every call is independent.
#[derive(Debug, Clone)]
pub struct NotebookResolver {
    /// Registered formats by tag and extension
    registry: FormatRegistry,
    /// Cache path computation
    locator: CacheLocator,
}

impl NotebookResolver {
    /// Create resolver with built-in formats
    ///
    /// UUID and record resolution need `cache_dir`.
    #[must_use]
    pub fn new(cache_dir: Option<PathBuf>) -> Self {
        Self {
            registry: default_formats(),
            locator: cache_dir.map_or_else(CacheLocator::unconfigured, CacheLocator::new),
        }
    }

    /// Create resolver over the configured cache directory
    #[must_use]
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            registry: default_formats(),
            locator: CacheLocator::from_config(config),
        }
    }

    /// Replace the format registry
    #[inline]
    #[must_use]
    pub fn with_registry(mut self, registry: FormatRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Format registry in use
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Cache locator in use
    #[inline]
    #[must_use]
    pub fn locator(&self) -> &CacheLocator {
        &self.locator
    }

    /// Resolve any notebook source
    pub fn resolve(&self, source: &NotebookSource) -> NotebookResult<Box<dyn NotebookDocument>> {
        match source {
            NotebookSource::Record { uuid } => self.from_uuid(uuid, DEFAULT_NOTEBOOK_TYPE),
            NotebookSource::Uuid {
                uuid,
                notebook_type,
            } => self.from_uuid(uuid, notebook_type),
            NotebookSource::File {
                path,
                notebook_type,
            } => self.from_file(path, notebook_type.as_deref()),
            NotebookSource::Text {
                text,
                notebook_type,
            } => self.from_string(text, notebook_type),
        }
    }

    /// Load the cached document for a gallery record
    pub fn from_record<R: NotebookRecord + ?Sized>(
        &self,
        record: &R,
    ) -> NotebookResult<Box<dyn NotebookDocument>> {
        tracing::debug!("Resolving notebook record {}", record.uuid());
        self.from_uuid(record.uuid(), DEFAULT_NOTEBOOK_TYPE)
    }

    /// Load a cached document by UUID
    ///
    /// # Errors
    /// - `NotebookError::Config` if no cache directory is configured
    /// - `NotebookError::InvalidUuid` if the UUID is not a plain file name
    /// - `NotebookError::UnsupportedFormat` for an unknown type
    /// - `NotebookError::Io` if the cache file can't be read
    /// - `NotebookError::Parse` if the cache file is malformed
    pub fn from_uuid(
        &self,
        uuid: &str,
        notebook_type: &str,
    ) -> NotebookResult<Box<dyn NotebookDocument>> {
        let path = self.cache_path(uuid, notebook_type)?;
        tracing::debug!("Notebook {} cached at {}", uuid, path.display());
        self.from_file(&path, Some(notebook_type))
    }

    /// Load a document from a file
    ///
    /// Without `notebook_type` the type is inferred from the file extension
    /// (case-sensitive; a missing extension is an error).
    pub fn from_file(
        &self,
        path: impl AsRef<Path>,
        notebook_type: Option<&str>,
    ) -> NotebookResult<Box<dyn NotebookDocument>> {
        let path = path.as_ref();
        let format = match notebook_type {
            Some(tag) => self.registry.by_tag(tag)?,
            None => self.registry.by_path(path)?,
        };
        tracing::debug!("Reading {} notebook {}", format.tag(), path.display());

        let text =
            std::fs::read_to_string(path).map_err(|e| NotebookError::io_error(path, e))?;
        Ok(format.parse(&text)?)
    }

    /// Parse a document from text
    pub fn from_string(
        &self,
        text: &str,
        notebook_type: &str,
    ) -> NotebookResult<Box<dyn NotebookDocument>> {
        let format = self.registry.by_tag(notebook_type)?;
        Ok(format.parse(text)?)
    }

    /// Cache path for a notebook, without reading it
    pub fn cache_path(&self, uuid: &str, notebook_type: &str) -> NotebookResult<PathBuf> {
        self.locator.path_for(uuid, notebook_type, &self.registry)
    }
}

impl Default for NotebookResolver {
    fn default() -> Self {
        Self::new(None)
    }
}
