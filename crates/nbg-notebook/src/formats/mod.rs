//! Notebook formats and the registry that maps type tags to them
//!
//! Each format ties together a type tag (`jupyter`), the file extension used
//! in the gallery cache (`ipynb`), and a parser producing
//! [`NotebookDocument`]s. Supporting a new notebook format means implementing
//! [`NotebookFormat`] and registering it; resolution code is unchanged.

use crate::document::NotebookDocument;
use crate::error::{ParseError, RegistryError, UnsupportedFormatError};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub mod jupyter;

pub use jupyter::{JupyterFormat, JupyterNotebook};

/// Type tag of the gallery's default notebook format
pub const DEFAULT_NOTEBOOK_TYPE: &str = JupyterFormat::TAG;

/// A notebook format: tag, cache file extension and parser
pub trait NotebookFormat: fmt::Debug + Send + Sync + 'static {
    /// Type tag, matched case-sensitively
    fn tag(&self) -> &'static str;

    /// File extension without the dot
    fn extension(&self) -> &'static str;

    /// Parse text into a document of this format
    fn parse(&self, text: &str) -> Result<Box<dyn NotebookDocument>, ParseError>;
}

/// Bidirectional tag ↔ extension ↔ format table
#[derive(Clone, Default)]
pub struct FormatRegistry {
    formats: Vec<Arc<dyn NotebookFormat>>,
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("tags", &self.tags())
            .field("extensions", &self.extensions())
            .finish()
    }
}

impl FormatRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// Register a format
    ///
    /// # Errors
    /// `RegistryError::Duplicate` if the tag or extension is already taken
    pub fn register<F: NotebookFormat>(&mut self, format: F) -> Result<(), RegistryError> {
        if self.formats.iter().any(|f| f.tag() == format.tag()) {
            return Err(RegistryError::Duplicate {
                kind: "notebook type",
                value: format.tag().to_string(),
            });
        }
        if self.formats.iter().any(|f| f.extension() == format.extension()) {
            return Err(RegistryError::Duplicate {
                kind: "file extension",
                value: format.extension().to_string(),
            });
        }
        self.formats.push(Arc::new(format));
        Ok(())
    }

    /// Find format by type tag
    pub fn by_tag(&self, tag: &str) -> Result<&dyn NotebookFormat, UnsupportedFormatError> {
        self.formats
            .iter()
            .find(|f| f.tag() == tag)
            .map(|f| &**f)
            .ok_or_else(|| UnsupportedFormatError::UnknownType(tag.to_string()))
    }

    /// Find format by file extension (without the dot)
    pub fn by_extension(&self, ext: &str) -> Result<&dyn NotebookFormat, UnsupportedFormatError> {
        self.formats
            .iter()
            .find(|f| f.extension() == ext)
            .map(|f| &**f)
            .ok_or_else(|| UnsupportedFormatError::UnknownExtension(ext.to_string()))
    }

    /// Find format from a path's extension
    ///
    /// A path without an extension is reported as unknown extension `''`.
    pub fn by_path(&self, path: &Path) -> Result<&dyn NotebookFormat, UnsupportedFormatError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy())
            .unwrap_or_default();
        self.by_extension(&ext)
    }

    /// Cache file extension for a type tag
    pub fn type_to_extension(&self, tag: &str) -> Result<&'static str, UnsupportedFormatError> {
        self.by_tag(tag).map(|f| f.extension())
    }

    /// Type tag for a cache file extension
    pub fn extension_to_type(&self, ext: &str) -> Result<&'static str, UnsupportedFormatError> {
        self.by_extension(ext).map(|f| f.tag())
    }

    /// All registered type tags
    #[must_use]
    pub fn tags(&self) -> Vec<&'static str> {
        self.formats.iter().map(|f| f.tag()).collect()
    }

    /// All registered extensions
    #[must_use]
    pub fn extensions(&self) -> Vec<&'static str> {
        self.formats.iter().map(|f| f.extension()).collect()
    }
}

/// Registry with every built-in format
#[must_use]
pub fn default_formats() -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    // The built-in set has no overlapping tags or extensions
    let _ = registry.register(JupyterFormat);
    registry
}
