//! # Error Types: Structural Failures
//!
//! Errors that abort a single call into the engine. All use `thiserror`.
//!
//! ## Design
//!
//! - A malformed schema source is a [`SchemaParseError`]. It is never
//!   defaulted to an empty schema.
//! - A payload that cannot be turned into a record is an
//!   [`ExtractionError`]. It aborts that request only.
//! - Per-field validation failures (unknown fields, rule violations,
//!   unsupported rules) are NOT errors here. They are data in the engine's
//!   error report.

use thiserror::Error;

/// Error while loading a schema source description.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaParseError {
    /// The source is not well-formed structured data.
    #[error("malformed schema source: {reason}")]
    Malformed {
        /// Parser diagnostic.
        reason: String,
    },

    /// The source root (or its `properties` member) is not a mapping.
    #[error("schema root must be a mapping of field names, found {found}")]
    RootNotMapping {
        /// Kind of the offending value.
        found: &'static str,
    },

    /// A field entry is not a mapping.
    #[error("field '{field}' must be a mapping, found {found}")]
    FieldNotMapping {
        /// Field name.
        field: String,
        /// Kind of the offending value.
        found: &'static str,
    },

    /// A field's `validations` member is not a flat mapping.
    #[error("field '{field}': validations must be a mapping of rule name to parameter, found {found}")]
    ValidationsNotMapping {
        /// Field name.
        field: String,
        /// Kind of the offending value.
        found: &'static str,
    },

    /// A field's `type` or `label` member is not a string.
    #[error("field '{field}': '{attribute}' must be a string")]
    AttributeNotString {
        /// Field name.
        field: String,
        /// `type` or `label`.
        attribute: &'static str,
    },

    /// The envelope `required` list is not a list of declared field names.
    #[error("invalid required list: {reason}")]
    InvalidRequiredList {
        /// What was wrong with the list.
        reason: String,
    },
}

/// Error while extracting a record from a raw payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The payload is not parseable as structured data.
    #[error("malformed payload: {reason}")]
    MalformedPayload {
        /// Parser diagnostic.
        reason: String,
    },

    /// Full-document extraction requires an object at the root.
    #[error("payload root must be an object, found {found}")]
    NotAnObject {
        /// Kind of the root value.
        found: &'static str,
    },

    /// A column was mapped to an unusable extraction path.
    #[error("column '{column}': invalid extraction path '{path}': {reason}")]
    InvalidPath {
        /// Column being extracted.
        column: String,
        /// The configured path.
        path: String,
        /// Why the path is unusable.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_display_names_field_and_kind() {
        let err = SchemaParseError::ValidationsNotMapping {
            field: "email".to_string(),
            found: "list",
        };
        assert_eq!(
            err.to_string(),
            "field 'email': validations must be a mapping of rule name to parameter, found list"
        );
    }

    #[test]
    fn extraction_error_display() {
        let err = ExtractionError::InvalidPath {
            column: "id".to_string(),
            path: String::new(),
            reason: "path is empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "column 'id': invalid extraction path '': path is empty"
        );
    }
}
