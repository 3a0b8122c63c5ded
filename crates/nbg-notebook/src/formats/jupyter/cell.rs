//! Jupyter cells and multiline text fields

use crate::document::{Cell, CellKind};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Deref;

/// Text stored either as one string or as a list of lines
///
/// Always held joined; always written as a list of lines, each keeping its
/// trailing newline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MultilineText(String);

impl MultilineText {
    /// Wrap text
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Joined text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lines in serialized form
    pub fn split_lines(&self) -> impl Iterator<Item = &str> {
        self.0.split_inclusive('\n')
    }
}

impl Deref for MultilineText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MultilineText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MultilineText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for MultilineText {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl Serialize for MultilineText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.split_lines())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextForm {
    Joined(String),
    Lines(Vec<String>),
}

impl<'de> Deserialize<'de> for MultilineText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match TextForm::deserialize(deserializer)? {
            TextForm::Joined(text) => Self(text),
            TextForm::Lines(lines) => Self(lines.concat()),
        })
    }
}

/// Join a string-or-list JSON value into one string
pub(super) fn join_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items
            .iter()
            .map(Value::as_str)
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.concat()),
        _ => None,
    }
}

/// One cell of an nbformat 4 notebook
///
/// Fields the crate doesn't model (`outputs`, `execution_count`,
/// `attachments`, ...) are kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JupyterCell {
    /// `code`, `markdown` or `raw`
    pub cell_type: String,
    /// Cell id (nbformat 4.5+)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Cell metadata
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Cell source
    #[serde(default)]
    pub source: MultilineText,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JupyterCell {
    /// Map the Jupyter cell type onto a format-independent kind
    #[must_use]
    pub fn kind(&self) -> CellKind {
        match self.cell_type.as_str() {
            "code" => CellKind::Code,
            "markdown" => CellKind::Documentation,
            _ => CellKind::Other,
        }
    }

    /// Outputs of a code cell; empty for other cells
    #[must_use]
    pub fn outputs(&self) -> &[Value] {
        self.extra
            .get("outputs")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Execution counter, if set
    #[must_use]
    pub fn execution_count(&self) -> Option<u64> {
        self.extra.get("execution_count").and_then(Value::as_u64)
    }

    /// Whether output stripping should leave this cell's outputs alone
    #[must_use]
    pub fn keeps_output(&self) -> bool {
        let flagged = self
            .metadata
            .get("keep_output")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        flagged || self.view(0).has_tag("keep_output")
    }

    /// Borrowed, format-independent view
    #[must_use]
    pub fn view(&self, index: usize) -> Cell<'_> {
        Cell {
            index,
            kind: self.kind(),
            cell_type: &self.cell_type,
            source: self.source.as_str(),
            metadata: &self.metadata,
        }
    }
}

/// MIME types written as lists of lines besides `text/*`
const SPLIT_MIME_TYPES: &[&str] = &["application/javascript", "image/svg+xml"];

/// Write multiline output and attachment text as lists of lines
///
/// Covers stream text and text-like MIME entries of rich outputs and
/// attachments. Other values, including JSON data, are left alone.
pub(super) fn split_multiline_fields(notebook: &mut Value) {
    let Some(cells) = notebook.get_mut("cells").and_then(Value::as_array_mut) else {
        return;
    };
    for cell in cells {
        if let Some(attachments) = cell.get_mut("attachments").and_then(Value::as_object_mut) {
            attachments.values_mut().for_each(split_mime_bundle);
        }
        let Some(outputs) = cell.get_mut("outputs").and_then(Value::as_array_mut) else {
            continue;
        };
        for output in outputs {
            let output_type = output
                .get("output_type")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let field = match output_type {
                "execute_result" | "display_data" => "data",
                "stream" => "text",
                _ => continue,
            };
            if let Some(value) = output.get_mut(field) {
                if field == "data" {
                    split_mime_bundle(value);
                } else {
                    split_text(value);
                }
            }
        }
    }
}

fn split_mime_bundle(bundle: &mut Value) {
    let Some(bundle) = bundle.as_object_mut() else {
        return;
    };
    for (mime, value) in bundle.iter_mut() {
        if mime.starts_with("text/") || SPLIT_MIME_TYPES.contains(&mime.as_str()) {
            split_text(value);
        }
    }
}

fn split_text(value: &mut Value) {
    if let Value::String(text) = value {
        let lines = text
            .split_inclusive('\n')
            .map(|line| Value::String(line.to_string()))
            .collect();
        *value = Value::Array(lines);
    }
}
