//! # Error Report
//!
//! Per-field validation failures. Every failing rule for a field is kept,
//! in evaluation order; nothing is truncated to the first failure.
//!
//! On the wire a report is a JSON object of field name to a single
//! human-readable message, with multiple failures for one field joined by
//! [`MESSAGE_SEPARATOR`]:
//!
//! ```json
//! { "name": "exceeds maximum length of 7", "count": "is required" }
//! ```

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Separator between multiple failure messages of one field.
pub const MESSAGE_SEPARATOR: &str = "; ";

/// Field name → failure messages. Empty iff the record is valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorReport {
    errors: BTreeMap<String, Vec<String>>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Record one failure for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Record several failures for `field`. An empty iterator leaves the
    /// report untouched, so passing fields never appear.
    pub fn extend_field<I>(&mut self, field: &str, messages: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut messages = messages.into_iter().peekable();
        if messages.peek().is_none() {
            return;
        }
        self.errors
            .entry(field.to_string())
            .or_default()
            .extend(messages);
    }

    /// All failure messages for `field`.
    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// The failures for `field` joined into one message.
    pub fn message(&self, field: &str) -> Option<String> {
        self.errors.get(field).map(|m| m.join(MESSAGE_SEPARATOR))
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Failing field names, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.errors.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }

    /// Flattened form: field → joined message.
    pub fn to_flat_map(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.clone(), messages.join(MESSAGE_SEPARATOR)))
            .collect()
    }
}

impl Serialize for ErrorReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, messages) in &self.errors {
            map.serialize_entry(field, &messages.join(MESSAGE_SEPARATOR))?;
        }
        map.end()
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, messages)) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {field}: {}", messages.join(MESSAGE_SEPARATOR))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_report_is_empty() {
        let report = ErrorReport::new();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
        assert_eq!(serde_json::to_value(&report).unwrap(), json!({}));
    }

    #[test]
    fn keeps_every_message_per_field() {
        let mut report = ErrorReport::new();
        report.push("name", "exceeds maximum length of 7");
        report.push("name", "does not match the required pattern");
        assert_eq!(report.len(), 1);
        assert_eq!(report.messages("name").unwrap().len(), 2);
        assert_eq!(
            report.message("name").as_deref(),
            Some("exceeds maximum length of 7; does not match the required pattern")
        );
    }

    #[test]
    fn extend_with_nothing_adds_no_entry() {
        let mut report = ErrorReport::new();
        report.extend_field("id", Vec::new());
        assert!(report.is_empty());
        report.extend_field("id", vec!["is required".to_string()]);
        assert!(report.contains("id"));
    }

    #[test]
    fn serializes_flat() {
        let mut report = ErrorReport::new();
        report.push("count", "exceeds maximum value of 10");
        report.push("email", "is required");
        report.push("email", "does not match the required pattern");
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "count": "exceeds maximum value of 10",
                "email": "is required; does not match the required pattern"
            })
        );
        assert_eq!(
            report.to_flat_map()["email"],
            "is required; does not match the required pattern"
        );
    }

    #[test]
    fn display_one_line_per_field() {
        let mut report = ErrorReport::new();
        report.push("a", "is required");
        report.push("b", "field not defined in schema");
        assert_eq!(
            report.to_string(),
            "  a: is required\n  b: field not defined in schema"
        );
    }
}
