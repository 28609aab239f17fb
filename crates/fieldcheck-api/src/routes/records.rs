//! # Record Routes
//!
//! Validated record intake for the tables in the catalog. The target table
//! is chosen by the `table_id` header.
//!
//! - `POST  /v1/records`      : extract with insert paths, validate
//! - `PATCH /v1/records/{id}` : extract with update paths, validate
//! - `GET   /v1/records`      : the table's blank column set and paging params
//!
//! Nothing is stored: a record that passes validation is echoed back under
//! the table's name.

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use fieldcheck_core::Record;
use fieldcheck_schema::{extract_fields, PathMap};
use serde::{Deserialize, Serialize};

use crate::catalog::TableDefinition;
use crate::error::AppError;
use crate::extractors::TableId;
use crate::state::AppState;

/// Assemble the record router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/records", get(list_columns).post(create_record))
        .route("/v1/records/{id}", patch(update_record))
}

// -- Response types -----------------------------------------------------------

/// A validated record, keyed by table name in success responses.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableRecord {
    pub column_vals: Record,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_val: Option<BTreeMap<String, String>>,
}

/// Paging and ordering query parameters, echoed back by `GET /v1/records`.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListParams {
    pub page: i64,
    pub limit: i64,
    pub order: String,
    pub sort: String,
}

/// Body of `GET /v1/records`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnListing {
    pub column_vals: Record,
    pub params: ListParams,
}

// -- Handlers -----------------------------------------------------------------

/// POST /v1/records: validate a new record.
async fn create_record(
    State(state): State<AppState>,
    table_id: TableId,
    body: Bytes,
) -> Result<Json<BTreeMap<String, TableRecord>>, AppError> {
    let table = lookup_table(&state, &table_id)?;
    let record = check_record(&state, table, &table.insert_paths, &body)?;

    tracing::info!(table = %table.name, "record accepted for insert");
    Ok(Json(BTreeMap::from([(
        table.name.clone(),
        TableRecord {
            column_vals: record,
            identity_val: None,
        },
    )])))
}

/// PATCH /v1/records/{id}: validate an update to an existing record.
async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    table_id: TableId,
    body: Bytes,
) -> Result<Json<BTreeMap<String, TableRecord>>, AppError> {
    let table = lookup_table(&state, &table_id)?;
    let record = check_record(&state, table, &table.update_paths, &body)?;

    tracing::info!(table = %table.name, id = %id, "record accepted for update");
    Ok(Json(BTreeMap::from([(
        table.name.clone(),
        TableRecord {
            column_vals: record,
            identity_val: Some(BTreeMap::from([("id".to_string(), id)])),
        },
    )])))
}

/// GET /v1/records: the table's columns, each blank, plus the query params.
async fn list_columns(
    State(state): State<AppState>,
    table_id: TableId,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ColumnListing>, AppError> {
    let Query(params) = params.map_err(|err| AppError::BadRequest(err.body_text()))?;
    let table = lookup_table(&state, &table_id)?;

    Ok(Json(ColumnListing {
        column_vals: table.schema.blank_record(),
        params,
    }))
}

// -- Helpers ------------------------------------------------------------------

fn lookup_table<'a>(state: &'a AppState, TableId(id): &TableId) -> Result<&'a TableDefinition, AppError> {
    state
        .catalog
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("table '{id}'")))
}

/// Extract a record from `body` and run it through the validator.
fn check_record(
    state: &AppState,
    table: &TableDefinition,
    paths: &PathMap,
    body: &[u8],
) -> Result<Record, AppError> {
    let record = extract_fields(body, paths)?;
    let report = state.validator.validate(&record, &table.schema);
    if report.is_empty() {
        Ok(record)
    } else {
        Err(AppError::Validation(report))
    }
}
