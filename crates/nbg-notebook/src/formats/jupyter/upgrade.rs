//! nbformat 3 → 4 upgrade
//!
//! Older gallery uploads are stored as nbformat 3. They are upgraded on read
//! so the rest of the crate only ever sees the version 4 layout.

use super::cell::join_text;
use crate::error::ParseError;
use serde_json::{json, Map, Value};

/// v3 output keys and the MIME types that replace them
const MIME_KEYS: &[(&str, &str)] = &[
    ("text", "text/plain"),
    ("html", "text/html"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpeg", "image/jpeg"),
    ("latex", "text/latex"),
    ("json", "application/json"),
    ("javascript", "application/javascript"),
];

/// Rewrite a version 3 notebook object into version 4 layout, in place
pub(super) fn upgrade_v3(root: &mut Map<String, Value>) -> Result<(), ParseError> {
    let worksheets = match root.remove("worksheets") {
        None => Vec::new(),
        Some(Value::Array(worksheets)) => worksheets,
        Some(_) => return Err(ParseError::invalid_field("worksheets", "expected a list")),
    };

    let mut cells = Vec::new();
    for (w, worksheet) in worksheets.into_iter().enumerate() {
        let Value::Object(mut worksheet) = worksheet else {
            return Err(ParseError::invalid_field(
                format!("worksheets[{w}]"),
                "expected an object",
            ));
        };
        match worksheet.remove("cells") {
            None => {}
            Some(Value::Array(ws_cells)) => {
                for (c, cell) in ws_cells.into_iter().enumerate() {
                    cells.push(upgrade_cell(cell, &format!("worksheets[{w}].cells[{c}]"))?);
                }
            }
            Some(_) => {
                return Err(ParseError::invalid_field(
                    format!("worksheets[{w}].cells"),
                    "expected a list",
                ))
            }
        }
    }
    root.insert("cells".to_string(), Value::Array(cells));

    let mut metadata = match root.remove("metadata") {
        Some(Value::Object(metadata)) => metadata,
        _ => Map::new(),
    };
    metadata.remove("name");
    metadata.remove("signature");
    metadata.insert("orig_nbformat".to_string(), json!(3));
    root.insert("metadata".to_string(), Value::Object(metadata));

    root.insert("nbformat".to_string(), json!(4));
    root.insert("nbformat_minor".to_string(), json!(0));
    Ok(())
}

fn upgrade_cell(cell: Value, location: &str) -> Result<Value, ParseError> {
    let Value::Object(mut cell) = cell else {
        return Err(ParseError::invalid_field(location, "expected an object"));
    };
    let cell_type = cell
        .get("cell_type")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::MissingField(format!("{location}.cell_type")))?
        .to_string();
    let mut metadata = match cell.remove("metadata") {
        Some(Value::Object(metadata)) => metadata,
        _ => Map::new(),
    };

    let upgraded = match cell_type.as_str() {
        "code" => {
            if let Some(collapsed) = cell.remove("collapsed") {
                metadata.insert("collapsed".to_string(), collapsed);
            }
            let outputs = match cell.remove("outputs") {
                Some(Value::Array(outputs)) => outputs.into_iter().map(upgrade_output).collect(),
                _ => Vec::new(),
            };
            json!({
                "cell_type": "code",
                "execution_count": cell.remove("prompt_number").unwrap_or(Value::Null),
                "metadata": metadata,
                "outputs": outputs,
                "source": cell.remove("input").unwrap_or_else(|| json!("")),
            })
        }
        "heading" => {
            let level = cell.get("level").and_then(Value::as_u64).unwrap_or(1).clamp(1, 6);
            let text = cell.get("source").and_then(join_text).unwrap_or_default();
            let text = text.lines().collect::<Vec<_>>().join(" ");
            // level is clamped to 1..=6
            #[allow(clippy::cast_possible_truncation)]
            let hashes = "#".repeat(level as usize);
            json!({
                "cell_type": "markdown",
                "metadata": metadata,
                "source": format!("{hashes} {text}"),
            })
        }
        "html" => json!({
            "cell_type": "markdown",
            "metadata": metadata,
            "source": cell.remove("source").unwrap_or_else(|| json!("")),
        }),
        _ => {
            cell.insert("metadata".to_string(), Value::Object(metadata));
            Value::Object(cell)
        }
    };
    Ok(upgraded)
}

fn upgrade_output(output: Value) -> Value {
    let Value::Object(mut output) = output else {
        return output;
    };
    let output_type = output
        .get("output_type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match output_type.as_str() {
        "pyout" | "display_data" => {
            let mut metadata = match output.remove("metadata") {
                Some(Value::Object(metadata)) => metadata,
                _ => Map::new(),
            };
            let mut result = Map::new();
            if output_type == "pyout" {
                result.insert("output_type".to_string(), json!("execute_result"));
                result.insert(
                    "execution_count".to_string(),
                    output.remove("prompt_number").unwrap_or(Value::Null),
                );
            } else {
                result.insert("output_type".to_string(), json!("display_data"));
            }
            output.remove("output_type");
            output.remove("execution_count");

            let mut data: Map<String, Value> = output.into_iter().collect();
            to_mime_keys(&mut data);
            to_mime_keys(&mut metadata);
            let embedded_json = match data.get("application/json") {
                Some(Value::String(raw)) => serde_json::from_str::<Value>(raw).ok(),
                _ => None,
            };
            if let Some(parsed) = embedded_json {
                data.insert("application/json".to_string(), parsed);
            }
            result.insert("data".to_string(), Value::Object(data));
            result.insert("metadata".to_string(), Value::Object(metadata));
            Value::Object(result)
        }
        "pyerr" => {
            output.insert("output_type".to_string(), json!("error"));
            Value::Object(output)
        }
        "stream" => {
            let name = output.remove("stream").unwrap_or_else(|| json!("stdout"));
            output.insert("name".to_string(), name);
            Value::Object(output)
        }
        _ => Value::Object(output),
    }
}

fn to_mime_keys(map: &mut Map<String, Value>) {
    for (short, mime) in MIME_KEYS {
        if let Some(value) = map.remove(*short) {
            map.insert((*mime).to_string(), value);
        }
    }
}
