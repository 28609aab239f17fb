//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! Everything here is read-only after startup: the table catalog and the
//! validator (with its frozen rule registry) are shared behind `Arc` and
//! never locked.

use std::path::PathBuf;
use std::sync::Arc;

use fieldcheck_schema::Validator;

use crate::catalog::{CatalogError, TableCatalog};

/// Default request body limit: 2 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Service configuration, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Table catalog file. `None` serves the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
    /// Emit JSON-formatted logs.
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            catalog_path: None,
            body_limit: DEFAULT_BODY_LIMIT,
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Build configuration from process environment variables.
    ///
    /// | Variable                  | Default        |
    /// |---------------------------|----------------|
    /// | `FIELDCHECK_PORT`, `PORT` | `8080`         |
    /// | `FIELDCHECK_CATALOG`      | built-in table |
    /// | `FIELDCHECK_BODY_LIMIT`   | 2 MiB          |
    /// | `FIELDCHECK_LOG_FORMAT`   | text           |
    ///
    /// Unparseable numbers fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("FIELDCHECK_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(defaults.port);

        let catalog_path = lookup("FIELDCHECK_CATALOG")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let body_limit = lookup("FIELDCHECK_BODY_LIMIT")
            .and_then(|b| b.trim().parse().ok())
            .unwrap_or(defaults.body_limit);

        let json_logs = lookup("FIELDCHECK_LOG_FORMAT")
            .map(|f| f.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(defaults.json_logs);

        Self {
            port,
            catalog_path,
            body_limit,
            json_logs,
        }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<TableCatalog>,
    pub validator: Arc<Validator>,
}

impl AppState {
    /// Default configuration, the built-in catalog and the built-in rules.
    pub fn new() -> Self {
        Self::with_parts(AppConfig::default(), TableCatalog::builtin(), Validator::default())
    }

    /// State for `config`, loading the catalog file it names.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the configured catalog cannot be loaded.
    pub fn with_config(config: AppConfig) -> Result<Self, CatalogError> {
        let catalog = match &config.catalog_path {
            Some(path) => TableCatalog::load(path)?,
            None => TableCatalog::builtin(),
        };
        Ok(Self::with_parts(config, catalog, Validator::default()))
    }

    pub fn with_parts(config: AppConfig, catalog: TableCatalog, validator: Validator) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog),
            validator: Arc::new(validator),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
