//! # Input Files
//!
//! Loading schema, record and payload files. Files ending in `.yaml` or
//! `.yml` are read as YAML, everything else as JSON.

use std::path::Path;

use anyhow::{Context, Result};
use fieldcheck_core::Record;
use fieldcheck_schema::{extract_fields, extract_from_value, PathMap, Schema};
use serde_json::Value as JsonValue;

/// Serialization format of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Read a JSON or YAML file into a JSON value.
pub fn read_document(path: &Path) -> Result<JsonValue> {
    let text = read_text(path)?;
    match DocumentFormat::from_path(path) {
        DocumentFormat::Json => serde_json::from_str(&text)
            .with_context(|| format!("failed to parse JSON from {}", path.display())),
        DocumentFormat::Yaml => serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse YAML from {}", path.display())),
    }
}

/// Load a schema file.
pub fn load_schema_file(path: &Path) -> Result<Schema> {
    let text = read_text(path)?;
    let schema = match DocumentFormat::from_path(path) {
        DocumentFormat::Json => Schema::from_json_str(&text),
        DocumentFormat::Yaml => Schema::from_yaml_str(&text),
    }
    .with_context(|| format!("invalid schema {}", path.display()))?;

    tracing::debug!(path = %path.display(), fields = schema.len(), "schema loaded");
    Ok(schema)
}

/// Load a record file. The document root must be a mapping.
pub fn read_record_file(path: &Path) -> Result<Record> {
    let document = read_document(path)?;
    Record::from_json(document).with_context(|| format!("invalid record {}", path.display()))
}

/// Extract a record from a payload file with `paths`.
///
/// JSON payloads go through the raw-text extractor, so a malformed payload
/// is reported as such. YAML payloads are converted first.
pub fn read_payload_record(path: &Path, paths: &PathMap) -> Result<Record> {
    let record = match DocumentFormat::from_path(path) {
        DocumentFormat::Json => extract_fields(read_text(path)?, paths),
        DocumentFormat::Yaml => extract_from_value(&read_document(path)?, paths),
    }
    .with_context(|| format!("cannot extract a record from {}", path.display()))?;

    tracing::debug!(path = %path.display(), columns = record.len(), "payload extracted");
    Ok(record)
}

/// Parse a `COLUMN=PATH` argument.
pub fn parse_path_mapping(arg: &str) -> std::result::Result<(String, String), String> {
    let (column, path) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=PATH, got '{arg}'"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("empty column name in '{arg}'"));
    }
    Ok((column.to_string(), path.trim().to_string()))
}

/// Collect `COLUMN=PATH` pairs into a path map. Later pairs win.
pub fn path_map(pairs: &[(String, String)]) -> PathMap {
    pairs.iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("s.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("s.YML")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("s.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("payload")), DocumentFormat::Json);
    }

    #[test]
    fn path_mapping_argument() {
        assert_eq!(
            parse_path_mapping("id=data.id").unwrap(),
            ("id".to_string(), "data.id".to_string())
        );
        // Only the first '=' splits.
        assert_eq!(
            parse_path_mapping("q=a\\.b=c").unwrap(),
            ("q".to_string(), "a\\.b=c".to_string())
        );
        assert!(parse_path_mapping("data.id").is_err());
        assert!(parse_path_mapping("=data.id").is_err());
    }

    #[test]
    fn yaml_record_file() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "count: 3\nemail: ada@example.com").unwrap();
        let record = read_record_file(file.path()).unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["count", "email"]);
    }

    #[test]
    fn list_record_file_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[1, 2]").unwrap();
        let err = read_record_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("list"), "{err:#}");
    }
}
