//! Error types for notebook documents
//!
//! One error type per failure class, so callers can react by kind:
//! - Unsupported notebook type or file extension
//! - Parse failures (text → document)
//! - Validation failures (document → structural check)
//! - Serialization failures (document → text)
//! - Missing configuration and file IO, via [`NotebookError`]

use nbg_config::ConfigError;
use std::fmt;
use std::path::PathBuf;

/// Notebook type or file extension with no registered format
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedFormatError {
    /// Unknown notebook type tag
    #[error("unknown notebook type '{0}'")]
    UnknownType(String),

    /// Unknown file extension
    #[error("unknown file extension '{0}'")]
    UnknownExtension(String),
}

/// Errors while registering notebook formats
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Tag or extension already claimed by another format
    #[error("{kind} '{value}' is already registered")]
    Duplicate {
        /// What was claimed, `notebook type` or `file extension`
        kind: &'static str,
        /// The claimed value
        value: String,
    },
}

/// Errors while parsing notebook text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Text is not syntactically valid for the format
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Top level is not the expected structure
    #[error("expected a {expected} at top level")]
    NotADocument {
        /// Structure the format requires
        expected: &'static str,
    },

    /// Required field absent
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// Field present with the wrong shape
    #[error("invalid field '{field}': {message}")]
    InvalidField {
        /// Field path, e.g. `cells[0].source`
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Format version this crate cannot read
    #[error("unsupported {format} version {version}")]
    UnsupportedVersion {
        /// Format name
        format: &'static str,
        /// Version found in the document
        version: u64,
    },
}

impl ParseError {
    /// Create invalid-field error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A single structural problem found by validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Where in the document, e.g. `cells[2].outputs`
    pub location: String,
    /// What is wrong
    pub message: String,
}

impl Violation {
    /// Create violation
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Document parsed but does not conform to its format's schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("notebook failed validation:\n{}", render_violations(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ValidationError {
    /// Create from collected violations
    ///
    /// Returns `None` when there is nothing to report.
    #[must_use]
    pub fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        (!violations.is_empty()).then_some(Self { violations })
    }

    /// All violations, in document order
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

/// Errors while serializing a document back to text
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// Encoder failed
    #[error("serialization failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Encoder produced bytes that are not UTF-8
    #[error("serialized output is not utf-8")]
    NotUtf8,
}

/// Combined notebook error
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    /// Gallery configuration is missing or unusable
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Unknown notebook type or extension
    #[error("unsupported format: {0}")]
    UnsupportedFormat(#[from] UnsupportedFormatError),

    /// Notebook file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// Notebook UUID cannot name a cache file
    #[error("invalid notebook uuid '{0}'")]
    InvalidUuid(String),

    /// Notebook text is malformed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Document fails its schema
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Document could not be written out
    #[error("serialize error: {0}")]
    Serialize(#[from] SerializeError),
}

impl NotebookError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for notebook operations
pub type NotebookResult<T> = Result<T, NotebookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_names_value() {
        let err = UnsupportedFormatError::UnknownExtension("xyz".to_string());
        assert_eq!(err.to_string(), "unknown file extension 'xyz'");

        let err = UnsupportedFormatError::UnknownType("iodide".to_string());
        assert_eq!(err.to_string(), "unknown notebook type 'iodide'");
    }

    #[test]
    fn invalid_uuid_names_value() {
        let err = NotebookError::InvalidUuid("../x".to_string());
        assert_eq!(err.to_string(), "invalid notebook uuid '../x'");
    }

    #[test]
    fn validation_error_requires_violations() {
        assert!(ValidationError::from_violations(Vec::new()).is_none());
    }

    #[test]
    fn validation_error_lists_each_violation() {
        let err = ValidationError::from_violations(vec![
            Violation::new("cells[0]", "unknown cell type 'heading'"),
            Violation::new("nbformat", "expected 4, found 3"),
        ])
        .unwrap();

        let text = err.to_string();
        assert!(text.contains("cells[0]: unknown cell type 'heading'"));
        assert!(text.contains("nbformat: expected 4, found 3"));
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn error_conversions() {
        let err: NotebookError = ParseError::MissingField("cells".to_string()).into();
        assert!(matches!(err, NotebookError::Parse(_)));

        let err: NotebookError = ConfigError::MissingCacheDir.into();
        assert!(matches!(err, NotebookError::Config(ConfigError::MissingCacheDir)));

        let err: NotebookError = UnsupportedFormatError::UnknownType("x".to_string()).into();
        assert!(matches!(err, NotebookError::UnsupportedFormat(_)));
    }

    #[test]
    fn io_error_keeps_path() {
        let err = NotebookError::io_error(
            "/cache/abc.ipynb",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(err.to_string().contains("/cache/abc.ipynb"));
    }
}
