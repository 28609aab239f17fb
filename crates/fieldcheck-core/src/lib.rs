//! # fieldcheck-core: Foundational Types for fieldcheck
//!
//! Defines the data that flows through the validation engine without any
//! of the engine's behaviour: the value model records are made of, the flat
//! record itself, and the structural errors that abort a call.
//!
//! ## Key Design Principles
//!
//! 1. **Closed value model.** [`Value`] is an exhaustive enum over absent,
//!    boolean, integer, float, string, list and object. Rules match on it
//!    instead of inspecting types at runtime.
//!
//! 2. **Absence is a value.** A field missing from a payload is
//!    [`Value::Absent`], not an error. Only the `required` rule decides
//!    whether absence matters.
//!
//! 3. **Structural errors are values.** Malformed schemas and payloads are
//!    returned as [`SchemaParseError`] and [`ExtractionError`]; per-field
//!    failures are never errors at this level.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `fieldcheck-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod record;
pub mod value;

pub use error::{ExtractionError, SchemaParseError};
pub use record::Record;
pub use value::{Value, ValueKind};
