//! Structural checks for nbformat 4 documents

use super::cell::JupyterCell;
use super::NotebookData;
use crate::error::Violation;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;

static CELL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{1,64}$").expect("cell id pattern is valid"));

/// Minor version from which every cell must carry an id
const CELL_ID_MINOR: u64 = 5;

/// Collect every schema violation in document order
pub(super) fn violations(data: &NotebookData) -> Vec<Violation> {
    let mut found = Vec::new();

    if data.nbformat != 4 {
        found.push(Violation::new(
            "nbformat",
            format!("expected 4, found {}", data.nbformat),
        ));
    }
    for key in data.extra.keys() {
        found.push(Violation::new(key.as_str(), "unexpected top-level field"));
    }
    check_notebook_metadata(&data.metadata, &mut found);

    let require_ids = data.nbformat_minor >= CELL_ID_MINOR;
    let mut seen_ids = HashSet::new();
    for (index, cell) in data.cells.iter().enumerate() {
        let location = format!("cells[{index}]");
        check_cell(cell, &location, &mut found);

        match &cell.id {
            Some(id) if !CELL_ID.is_match(id) => {
                found.push(Violation::new(format!("{location}.id"), format!("invalid cell id '{id}'")));
            }
            Some(id) if !seen_ids.insert(id.as_str()) => {
                found.push(Violation::new(format!("{location}.id"), format!("duplicate cell id '{id}'")));
            }
            None if require_ids => {
                found.push(Violation::new(
                    format!("{location}.id"),
                    format!("cell id required from nbformat 4.{CELL_ID_MINOR}"),
                ));
            }
            _ => {}
        }
    }

    found
}

fn check_notebook_metadata(metadata: &Map<String, Value>, found: &mut Vec<Violation>) {
    if let Some(kernelspec) = metadata.get("kernelspec") {
        for field in ["name", "display_name"] {
            if kernelspec.get(field).and_then(Value::as_str).is_none() {
                found.push(Violation::new(
                    format!("metadata.kernelspec.{field}"),
                    "expected a string",
                ));
            }
        }
    }
    if let Some(language_info) = metadata.get("language_info") {
        if language_info.get("name").and_then(Value::as_str).is_none() {
            found.push(Violation::new("metadata.language_info.name", "expected a string"));
        }
    }
}

fn check_cell(cell: &JupyterCell, location: &str, found: &mut Vec<Violation>) {
    let allowed: &[&str] = match cell.cell_type.as_str() {
        "code" => {
            check_code_cell(cell, location, found);
            &["outputs", "execution_count"]
        }
        "markdown" | "raw" => &["attachments"],
        other => {
            found.push(Violation::new(
                format!("{location}.cell_type"),
                format!("unknown cell type '{other}'"),
            ));
            return;
        }
    };

    for key in cell.extra.keys() {
        if !allowed.contains(&key.as_str()) {
            found.push(Violation::new(
                format!("{location}.{key}"),
                format!("not allowed in a {} cell", cell.cell_type),
            ));
        }
    }
    if let Some(attachments) = cell.extra.get("attachments") {
        if !attachments.is_object() {
            found.push(Violation::new(format!("{location}.attachments"), "expected an object"));
        }
    }
}

fn check_code_cell(cell: &JupyterCell, location: &str, found: &mut Vec<Violation>) {
    match cell.extra.get("execution_count") {
        None => found.push(Violation::new(
            format!("{location}.execution_count"),
            "missing required field",
        )),
        Some(Value::Null) => {}
        Some(count) if count.as_u64().is_some() => {}
        Some(_) => found.push(Violation::new(
            format!("{location}.execution_count"),
            "expected null or a non-negative integer",
        )),
    }

    let outputs = match cell.extra.get("outputs") {
        None => {
            found.push(Violation::new(format!("{location}.outputs"), "missing required field"));
            return;
        }
        Some(Value::Array(outputs)) => outputs,
        Some(_) => {
            found.push(Violation::new(format!("{location}.outputs"), "expected a list"));
            return;
        }
    };
    for (index, output) in outputs.iter().enumerate() {
        check_output(output, &format!("{location}.outputs[{index}]"), found);
    }
}

fn check_output(output: &Value, location: &str, found: &mut Vec<Violation>) {
    let Some(output_type) = output.get("output_type").and_then(Value::as_str) else {
        found.push(Violation::new(format!("{location}.output_type"), "expected a string"));
        return;
    };
    let required: &[&str] = match output_type {
        "stream" => &["name", "text"],
        "display_data" => &["data", "metadata"],
        "execute_result" => &["data", "metadata", "execution_count"],
        "error" => &["ename", "evalue", "traceback"],
        other => {
            found.push(Violation::new(
                format!("{location}.output_type"),
                format!("unknown output type '{other}'"),
            ));
            return;
        }
    };
    for field in required {
        if output.get(*field).is_none() {
            found.push(Violation::new(
                format!("{location}.{field}"),
                format!("missing required field for {output_type} output"),
            ));
        }
    }
}
