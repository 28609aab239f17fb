//! # API Route Modules
//!
//! - `records`: validated record intake for catalog tables, selected by
//!   the `table_id` header.
//! - `validate`: ad-hoc validation against a schema carried in the
//!   request, and the registered rule listing.

pub mod records;
pub mod validate;
