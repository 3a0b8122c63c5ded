//! Jupyter notebooks (`.ipynb`)
//!
//! Documents are read as nbformat 4; nbformat 3 files are upgraded while
//! parsing. Text is written back the way Jupyter writes it: keys sorted,
//! one-space indent, multiline strings split into lists of lines.

use crate::document::{CellFilter, CellIter, NotebookDocument};
use crate::error::{ParseError, SerializeError, ValidationError};
use crate::formats::NotebookFormat;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::any::Any;
use std::str::FromStr;

mod cell;
mod upgrade;
mod validate;

pub use cell::{JupyterCell, MultilineText};

/// Notebook metadata keys removed by [`JupyterNotebook::strip_output`]
pub const STRIPPED_NOTEBOOK_METADATA: &[&str] = &["signature", "widgets"];

/// Cell metadata keys removed by [`JupyterNotebook::strip_output`]
pub const STRIPPED_CELL_METADATA: &[&str] = &["collapsed", "scrolled", "ExecuteTime", "execution"];

/// Execution counters reset by [`JupyterNotebook::strip_output`]
const EXECUTION_COUNTERS: &[&str] = &["execution_count", "prompt_number"];

/// Parsed nbformat 4 document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookData {
    /// Cells in document order
    pub cells: Vec<JupyterCell>,
    /// Notebook metadata (kernelspec, language_info, ...)
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Major format version
    pub nbformat: u64,
    /// Minor format version
    #[serde(default)]
    pub nbformat_minor: u64,
    /// Unrecognized top-level fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Jupyter notebook format registration
#[derive(Debug, Clone, Copy, Default)]
pub struct JupyterFormat;

impl JupyterFormat {
    /// Type tag
    pub const TAG: &'static str = "jupyter";

    /// Cache file extension
    pub const EXTENSION: &'static str = "ipynb";
}

impl NotebookFormat for JupyterFormat {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn extension(&self) -> &'static str {
        Self::EXTENSION
    }

    fn parse(&self, text: &str) -> Result<Box<dyn NotebookDocument>, ParseError> {
        Ok(Box::new(JupyterNotebook::parse(text)?))
    }
}

/// A Jupyter notebook document
#[derive(Debug, Clone)]
pub struct JupyterNotebook {
    raw: String,
    data: NotebookData,
}

impl JupyterNotebook {
    /// Parse notebook text
    ///
    /// # Errors
    /// - `ParseError::Syntax` if the text is not JSON
    /// - `ParseError::NotADocument` if the JSON is not an object
    /// - `ParseError::MissingField` / `InvalidField` for absent or malformed
    ///   required fields
    /// - `ParseError::UnsupportedVersion` for nbformat other than 3 or 4
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ParseError::Syntax(e.to_string()))?;
        let Value::Object(mut root) = value else {
            return Err(ParseError::NotADocument {
                expected: "JSON object",
            });
        };

        let version = root
            .get("nbformat")
            .ok_or_else(|| ParseError::MissingField("nbformat".to_string()))?
            .as_u64()
            .ok_or_else(|| ParseError::invalid_field("nbformat", "expected a non-negative integer"))?;
        match version {
            3 => {
                tracing::debug!("Upgrading nbformat 3 notebook");
                upgrade::upgrade_v3(&mut root)?;
            }
            4 => {}
            other => {
                return Err(ParseError::UnsupportedVersion {
                    format: "nbformat",
                    version: other,
                })
            }
        }

        match root.get("cells") {
            None => return Err(ParseError::MissingField("cells".to_string())),
            Some(Value::Array(_)) => {}
            Some(_) => return Err(ParseError::invalid_field("cells", "expected a list")),
        }
        if root.get("metadata").is_some_and(|m| !m.is_object()) {
            return Err(ParseError::invalid_field("metadata", "expected an object"));
        }

        let data: NotebookData = serde_json::from_value(Value::Object(root))
            .map_err(|e| ParseError::invalid_field("notebook", e.to_string()))?;

        Ok(Self {
            raw: text.to_string(),
            data,
        })
    }

    /// Parsed document
    #[inline]
    #[must_use]
    pub fn data(&self) -> &NotebookData {
        &self.data
    }

    /// Jupyter cells in document order
    #[inline]
    #[must_use]
    pub fn jupyter_cells(&self) -> &[JupyterCell] {
        &self.data.cells
    }

    /// `(nbformat, nbformat_minor)`
    #[inline]
    #[must_use]
    pub fn version(&self) -> (u64, u64) {
        (self.data.nbformat, self.data.nbformat_minor)
    }

    /// Remove outputs, execution counters and volatile metadata
    ///
    /// Cells flagged `keep_output` (metadata key or tag) keep their outputs,
    /// though counters inside them are still reset. A notebook-level
    /// `keep_output: true` keeps the outputs of every cell.
    pub fn strip_output(&mut self) {
        for key in STRIPPED_NOTEBOOK_METADATA {
            self.data.metadata.remove(*key);
        }
        let keep_all = self
            .data
            .metadata
            .get("keep_output")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        for cell in &mut self.data.cells {
            let keep = keep_all || cell.keeps_output();
            if let Some(outputs) = cell.extra.get_mut("outputs") {
                if !keep {
                    *outputs = Value::Array(Vec::new());
                } else if let Value::Array(items) = outputs {
                    for output in items.iter_mut().filter_map(Value::as_object_mut) {
                        if let Some(count) = output.get_mut("execution_count") {
                            *count = Value::Null;
                        }
                    }
                }
            }
            for key in EXECUTION_COUNTERS {
                if let Some(count) = cell.extra.get_mut(*key) {
                    *count = Value::Null;
                }
            }
            for key in STRIPPED_CELL_METADATA {
                cell.metadata.remove(*key);
            }
        }
    }

    fn to_canonical_text(&self) -> Result<String, SerializeError> {
        // Going through Value sorts keys at every level
        let mut value = serde_json::to_value(&self.data)?;
        cell::split_multiline_fields(&mut value);
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
        value.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|_| SerializeError::NotUtf8)
    }
}

impl FromStr for JupyterNotebook {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl NotebookDocument for JupyterNotebook {
    fn notebook_type(&self) -> &str {
        JupyterFormat::TAG
    }

    fn raw_text(&self) -> &str {
        &self.raw
    }

    fn content(&self) -> Result<String, SerializeError> {
        self.to_canonical_text()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match ValidationError::from_violations(validate::violations(&self.data)) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn clean(&mut self) -> &mut dyn NotebookDocument {
        self.strip_output();
        self
    }

    fn cells_where(&self, filter: CellFilter) -> CellIter<'_> {
        Box::new(
            self.data
                .cells
                .iter()
                .enumerate()
                .map(|(index, cell)| cell.view(index))
                .filter(move |cell| filter.matches(cell)),
        )
    }

    fn metadata(&self) -> &Map<String, Value> {
        &self.data.metadata
    }

    fn language_version(&self) -> (Option<&str>, Option<&str>) {
        let metadata = &self.data.metadata;
        // language_info counts only when it names both language and version
        if let Some(language_info) = metadata.get("language_info") {
            let name = language_info.get("name").and_then(Value::as_str);
            let version = language_info.get("version").and_then(Value::as_str);
            if let (Some(name), Some(version)) = (name, version) {
                return (Some(name), Some(version));
            }
        }

        let kernel_language = metadata
            .get("kernelspec")
            .and_then(|ks| ks.get("language"))
            .and_then(Value::as_str);
        (kernel_language, None)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
