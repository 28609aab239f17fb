//! # Table Catalog
//!
//! Maps the `table_id` a client sends to the table's name, its schema, and
//! the extraction paths used for inserts and updates. The catalog is read
//! once at startup and never mutated; there is no persistence behind it.
//!
//! ## File Format
//!
//! YAML or JSON (chosen by extension, YAML otherwise):
//!
//! ```yaml
//! tables:
//!   users:
//!     name: users
//!     schema:
//!       properties:
//!         id: { type: string, label: id, validations: { required: true } }
//!     paths:
//!       insert: { id: data.id }
//!       update: { id: data.id }
//! ```
//!
//! Without a catalog file the built-in catalog serves the `users` table.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fieldcheck_core::SchemaParseError;
use fieldcheck_schema::{load_schema, FieldSchema, PathMap, Schema};
use serde::Deserialize;
use thiserror::Error;

/// Error loading a catalog file.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("cannot read catalog '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file is not valid YAML/JSON of the expected shape.
    #[error("invalid catalog '{path}': {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A table's schema failed to load.
    #[error("table '{table}': {source}")]
    Schema {
        table: String,
        #[source]
        source: SchemaParseError,
    },
}

/// One table known to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    /// Table name, used as the key of success responses.
    pub name: String,
    pub schema: Schema,
    /// Column → path map for `POST` bodies. Empty means the body is the record.
    pub insert_paths: PathMap,
    /// Column → path map for `PATCH` bodies.
    pub update_paths: PathMap,
}

/// `table_id` → [`TableDefinition`].
#[derive(Debug, Clone, Default)]
pub struct TableCatalog {
    tables: BTreeMap<String, TableDefinition>,
}

#[derive(Deserialize)]
struct CatalogFile {
    tables: BTreeMap<String, TableEntry>,
}

#[derive(Deserialize)]
struct TableEntry {
    name: String,
    schema: serde_json::Value,
    #[serde(default)]
    paths: PathEntry,
}

#[derive(Deserialize, Default)]
struct PathEntry {
    #[serde(default)]
    insert: PathMap,
    #[serde(default)]
    update: PathMap,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog served when no catalog file is configured.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.insert("users", users_table());
        catalog
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read or parsed, or if
    /// any table's schema is malformed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        let file: CatalogFile = if is_json {
            serde_json::from_str::<CatalogFile>(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<CatalogFile>(&content).map_err(|e| e.to_string())
        }
        .map_err(|reason| CatalogError::Parse {
            path: path.to_path_buf(),
            reason,
        })?;

        let mut catalog = Self::new();
        for (table_id, entry) in file.tables {
            let schema = load_schema(&entry.schema).map_err(|source| CatalogError::Schema {
                table: table_id.clone(),
                source,
            })?;
            catalog.insert(
                table_id,
                TableDefinition {
                    name: entry.name,
                    schema,
                    insert_paths: entry.paths.insert,
                    update_paths: entry.paths.update,
                },
            );
        }

        tracing::info!(path = %path.display(), tables = catalog.len(), "table catalog loaded");
        Ok(catalog)
    }

    pub fn insert(&mut self, table_id: impl Into<String>, table: TableDefinition) {
        self.tables.insert(table_id.into(), table);
    }

    pub fn get(&self, table_id: &str) -> Option<&TableDefinition> {
        self.tables.get(table_id)
    }

    /// Known table ids, sorted.
    pub fn table_ids(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// The `users` table: count, email, name and id, each read from `data.<field>`.
fn users_table() -> TableDefinition {
    let schema = Schema::from_fields([
        (
            "count",
            FieldSchema::new("integer", "count")
                .with_rule("required", true)
                .with_rule("max", 10i64),
        ),
        (
            "email",
            FieldSchema::new("string", "email")
                .with_rule("pattern", r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
                .with_rule("required", true),
        ),
        (
            "name",
            FieldSchema::new("string", "name")
                .with_rule("max", 7i64)
                .with_rule("min", 3i64),
        ),
        ("id", FieldSchema::new("string", "id").with_rule("required", true)),
    ]);

    let paths: PathMap = ["count", "email", "name", "id"]
        .into_iter()
        .map(|field| (field.to_string(), format!("data.{field}")))
        .collect();

    TableDefinition {
        name: "users".to_string(),
        schema,
        insert_paths: paths.clone(),
        update_paths: paths,
    }
}
