//! # fieldcheck-cli: CLI Tool for fieldcheck
//!
//! Provides the `fieldcheck` command-line interface over the validation
//! engine.
//!
//! ## Subcommands
//!
//! - `fieldcheck validate`: Validate a record or payload against a schema.
//! - `fieldcheck extract`: Extract a record from a payload by path.
//! - `fieldcheck schema`: Show the fields and rules of a schema file.
//! - `fieldcheck rules`: List registered rule names.
//!
//! ```bash
//! fieldcheck validate --schema users.yaml --payload body.json \
//!     --path id=data.id --path email=data.email
//! fieldcheck extract --payload body.json --path id=/data/id
//! ```
//!
//! ## Exit Codes
//!
//! `0` success or valid record, `1` validation failures, `2` operational
//! error (unreadable file, bad schema, malformed payload).

pub mod extract;
pub mod input;
pub mod inspect;
pub mod validate;

/// Exit code for an operational error.
pub const EXIT_ERROR: u8 = 2;
