//! # fieldcheck-schema: Schema-Driven Record Validation
//!
//! The validation engine. Given a declarative [`Schema`] and a flat
//! [`Record`](fieldcheck_core::Record), it decides whether the record
//! satisfies the schema and, if not, reports every failure per field.
//!
//! ## Data Flow
//!
//! ```text
//! raw payload ─► extract_fields ─► Record ─► unknown-field guard ─► rule dispatch ─► ErrorReport
//!                                              (Schema)              (Schema + RuleRegistry)
//! ```
//!
//! ## Entry Points
//!
//! - [`load_schema`] / [`Schema::from_json_str`] / [`Schema::from_yaml_str`]
//!   parse a schema description of the shape
//!   `{ field: { type, label, validations: { rule: param } } }`.
//! - [`extract_fields`] builds a record from a raw payload and a
//!   column → path map.
//! - [`validate`] (or a long-lived [`Validator`]) produces an
//!   [`ErrorReport`], empty iff the record is valid.
//!
//! ## Crate Policy
//!
//! - Depends only on `fieldcheck-core` internally.
//! - Structural problems (bad schema, bad payload) are `Result` errors.
//!   Per-field failures are data in the report, never errors or panics.
//! - Rule evaluation never mutates the schema or the record.

pub mod extract;
pub mod registry;
pub mod report;
pub mod rules;
pub mod schema;
pub mod validate;

pub use extract::{extract_fields, extract_from_value, resolve_path, PathMap};
pub use registry::RuleRegistry;
pub use report::ErrorReport;
pub use rules::{MaxRule, MinRule, PatternRule, RequiredRule, Rule};
pub use schema::{load_schema, FieldSchema, Schema};
pub use validate::{check_unknown_fields, validate, AbsencePolicy, Validator, UNKNOWN_FIELD_MESSAGE};
