//! Format-independent notebook document interface
//!
//! Every supported notebook format (Jupyter today; iodide, RStudio, ... later)
//! implements [`NotebookDocument`]. Callers work against the trait and never
//! need to know which format a gallery notebook is stored in.

use crate::error::{SerializeError, ValidationError};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;

/// Boxed iterator over cells
pub type CellIter<'a> = Box<dyn Iterator<Item = Cell<'a>> + 'a>;

/// Boxed iterator over cell sources
pub type SourceIter<'a> = Box<dyn Iterator<Item = &'a str> + 'a>;

/// Format-independent classification of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Executable code
    Code,
    /// Prose / documentation
    Documentation,
    /// Anything else (raw cells, unknown types)
    Other,
}

/// Borrowed view of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell<'a> {
    /// Position in the document
    pub index: usize,
    /// Classification
    pub kind: CellKind,
    /// The format's own cell type tag (e.g. `markdown`)
    pub cell_type: &'a str,
    /// Source text
    pub source: &'a str,
    /// Per-cell metadata
    pub metadata: &'a Map<String, Value>,
}

impl<'a> Cell<'a> {
    /// Tags listed under the `tags` metadata key
    ///
    /// Non-string entries are skipped.
    pub fn tags(&self) -> impl Iterator<Item = &'a str> {
        let metadata: &'a Map<String, Value> = self.metadata;
        metadata
            .get("tags")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    /// Whether the cell carries `tag`
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().any(|t| t == tag)
    }
}

/// Cell selection criteria
///
/// Every criterion that is set must match; an empty filter matches all cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellFilter {
    kind: Option<CellKind>,
    cell_type: Option<String>,
    tag: Option<String>,
}

impl CellFilter {
    /// Filter matching every cell
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on cell kind
    #[inline]
    #[must_use]
    pub fn kind(kind: CellKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Also require the format's own cell type tag
    #[inline]
    #[must_use]
    pub fn with_cell_type(mut self, cell_type: impl Into<String>) -> Self {
        self.cell_type = Some(cell_type.into());
        self
    }

    /// Also require a metadata tag
    #[inline]
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Check a cell against this filter
    #[must_use]
    pub fn matches(&self, cell: &Cell<'_>) -> bool {
        self.kind.map_or(true, |k| cell.kind == k)
            && self.cell_type.as_deref().map_or(true, |t| cell.cell_type == t)
            && self.tag.as_deref().map_or(true, |t| cell.has_tag(t))
    }
}

/// A parsed notebook document of some format
///
/// Implementations parse on construction, so an instance always holds a
/// well-formed parsed form. The parsed form only changes through
/// [`NotebookDocument::clean`].
///
/// Iteration methods return fresh iterators on every call; iterating never
/// re-parses and never consumes shared state.
pub trait NotebookDocument: fmt::Debug + Send + Sync + 'static {
    /// Format tag, e.g. `jupyter`
    fn notebook_type(&self) -> &str;

    /// The text this document was parsed from
    fn raw_text(&self) -> &str;

    /// Canonical text of the current parsed form, suitable for writing to disk
    ///
    /// Re-parsing the result and serializing again yields identical text.
    fn content(&self) -> Result<String, SerializeError>;

    /// Check the document against its format's schema without modifying it
    fn validate(&self) -> Result<(), ValidationError>;

    /// Strip outputs and non-essential metadata in place
    ///
    /// Sources and cell order are untouched. Idempotent. Returns the same
    /// document for chaining.
    fn clean(&mut self) -> &mut dyn NotebookDocument;

    /// Cells matching `filter`, in document order
    fn cells_where(&self, filter: CellFilter) -> CellIter<'_>;

    /// Document-level metadata
    fn metadata(&self) -> &Map<String, Value>;

    /// Language and version, either of which may be unknown
    fn language_version(&self) -> (Option<&str>, Option<&str>);

    /// Concrete document, for format-specific access
    fn as_any(&self) -> &dyn Any;

    /// All cells, in document order
    fn cells(&self) -> CellIter<'_> {
        self.cells_where(CellFilter::all())
    }

    /// Source text of every cell, in document order
    fn sources(&self) -> SourceIter<'_> {
        self.sources_where(CellFilter::all())
    }

    /// Source text of cells matching `filter`
    fn sources_where(&self, filter: CellFilter) -> SourceIter<'_> {
        Box::new(self.cells_where(filter).map(|cell| cell.source))
    }

    /// Source text of code cells
    fn code_sources(&self) -> SourceIter<'_> {
        self.sources_where(CellFilter::kind(CellKind::Code))
    }

    /// Source text of documentation cells
    fn doc_sources(&self) -> SourceIter<'_> {
        self.sources_where(CellFilter::kind(CellKind::Documentation))
    }

    /// Language of the notebook
    fn language(&self) -> Option<&str> {
        self.language_version().0
    }
}
