//! # Field Extractor
//!
//! Builds a flat [`Record`] out of a raw structured payload.
//!
//! With a non-empty [`PathMap`], each column is resolved from the payload
//! by its path. With an empty map the whole payload is taken as the record
//! and must be a JSON object.
//!
//! ## Path Syntax
//!
//! - Paths starting with `/` are RFC 6901 JSON pointers (`/data/id`).
//! - Anything else is a dot-path (`data.id`). Numeric segments index into
//!   lists (`items.0.sku`), `\.` escapes a literal dot in a key, and a final
//!   `#` segment yields the length of a list (`items.#`).
//!
//! A path that resolves to nothing yields [`Value::Absent`] for its column.
//! That is not an extraction error: absence is judged later by `required`.
//! A payload that is not valid JSON is always an error, in either mode.

use std::collections::BTreeMap;

use fieldcheck_core::{ExtractionError, Record, Value};
use serde_json::Value as JsonValue;

/// Column name → extraction path.
pub type PathMap = BTreeMap<String, String>;

/// Parse `payload` as JSON and extract a record from it.
///
/// # Errors
///
/// Returns [`ExtractionError::MalformedPayload`] if the payload is not JSON,
/// plus any error from [`extract_from_value`].
pub fn extract_fields(payload: impl AsRef<[u8]>, paths: &PathMap) -> Result<Record, ExtractionError> {
    let document: JsonValue = serde_json::from_slice(payload.as_ref()).map_err(|e| {
        ExtractionError::MalformedPayload {
            reason: e.to_string(),
        }
    })?;
    extract_from_value(&document, paths)
}

/// Extract a record from an already parsed payload.
///
/// # Errors
///
/// Returns [`ExtractionError::NotAnObject`] if `paths` is empty and the
/// document root is not an object, and [`ExtractionError::InvalidPath`] for
/// an empty path.
pub fn extract_from_value(document: &JsonValue, paths: &PathMap) -> Result<Record, ExtractionError> {
    if paths.is_empty() {
        return Record::from_json(document.clone());
    }

    let mut record = Record::new();
    for (column, path) in paths {
        let value = resolve_path(document, path).map_err(|reason| ExtractionError::InvalidPath {
            column: column.clone(),
            path: path.clone(),
            reason,
        })?;
        if value.is_absent() {
            tracing::trace!(column = %column, path = %path, "extraction path resolved to nothing");
        }
        record.insert(column.clone(), value);
    }
    Ok(record)
}

/// Resolve a single path against a document.
///
/// Returns `Ok(Value::Absent)` when nothing is found, and `Err` only for a
/// path that can never resolve (an empty path).
pub fn resolve_path(document: &JsonValue, path: &str) -> Result<Value, String> {
    if path.is_empty() {
        return Err("path is empty".to_string());
    }

    if path.starts_with('/') {
        return Ok(document.pointer(path).map(Value::from).unwrap_or_default());
    }

    let segments = split_dot_path(path);
    let last = segments.len() - 1;
    let mut current = document;

    for (i, segment) in segments.iter().enumerate() {
        if segment == "#" {
            return Ok(match current {
                JsonValue::Array(items) if i == last => Value::Integer(items.len() as i64),
                _ => Value::Absent,
            });
        }

        let next = match current {
            JsonValue::Object(map) => map.get(segment.as_str()),
            JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            _ => None,
        };

        match next {
            Some(value) => current = value,
            None => return Ok(Value::Absent),
        }
    }

    Ok(Value::from(current))
}

/// Split a dot-path into segments, honouring `\.` as a literal dot.
fn split_dot_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut segment = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => segment.push(escaped),
                None => segment.push('\\'),
            },
            '.' => segments.push(std::mem::take(&mut segment)),
            other => segment.push(other),
        }
    }
    segments.push(segment);
    segments
}
