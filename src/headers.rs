//! Header block parsing
//!
//! The header editor accepts two shapes of text:
//! - a JSON object, `{"Accept": "application/json"}`
//! - `Key: Value` lines, one per header
//!
//! JSON is tried first; anything that is not a JSON object falls back to lines.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::Headers;

/// Parse a free-form header block into an ordered mapping
pub fn parse_headers(text: &str) -> Result<Headers> {
    let stripped = text.trim();
    if stripped.is_empty() {
        return Ok(Headers::new());
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(stripped) {
        tracing::debug!(count = map.len(), "Parsed headers as JSON object");
        return Ok(map
            .into_iter()
            .map(|(key, value)| (key, value_to_string(value)))
            .collect());
    }

    let mut headers = Headers::new();
    for line in stripped.split(|c: char| c == '\r' || c == '\n') {
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(Error::HeaderParse {
                line: line.to_string(),
            });
        };
        headers.insert(key.trim().to_string(), value.trim().to_string());
    }

    tracing::debug!(count = headers.len(), "Parsed headers as lines");
    Ok(headers)
}

/// Strings are taken as-is; every other JSON value keeps its JSON spelling.
fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Render headers back into editable `Key: Value` lines
pub fn headers_to_text(headers: &Headers) -> String {
    headers
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}
