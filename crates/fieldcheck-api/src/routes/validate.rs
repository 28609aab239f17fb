//! # Ad-hoc Validation Routes
//!
//! - `POST /v1/validate`: validate a record (or an extracted payload)
//!   against a schema supplied in the request
//! - `GET  /v1/rules`   : registered rule names
//!
//! Unlike `/v1/records`, a failing record is not an HTTP error here: the
//! response is 200 with `valid: false` and the report.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use fieldcheck_core::Record;
use fieldcheck_schema::{extract_fields, extract_from_value, load_schema, AbsencePolicy, ErrorReport, PathMap};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Assemble the validation router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/validate", post(validate_record))
        .route("/v1/rules", get(list_rules))
}

/// Request body of `POST /v1/validate`.
///
/// Exactly one of `record` and `payload` must be set. A `payload` given as
/// a JSON string is parsed first; any other `payload` is used as is.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub schema: JsonValue,
    #[serde(default)]
    pub record: Option<JsonValue>,
    #[serde(default)]
    pub payload: Option<JsonValue>,
    #[serde(default)]
    pub paths: PathMap,
    /// Only validate schema fields present in the record.
    #[serde(default)]
    pub present_only: bool,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: ErrorReport,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RulesResponse {
    pub rules: Vec<String>,
}

/// POST /v1/validate
async fn validate_record(
    State(state): State<AppState>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, AppError> {
    let req = extract_json(body)?;
    let schema = load_schema(&req.schema)?;

    let record = match (req.record, req.payload) {
        (Some(record), None) => Record::from_json(record)?,
        (None, Some(JsonValue::String(raw))) => extract_fields(raw, &req.paths)?,
        (None, Some(payload)) => extract_from_value(&payload, &req.paths)?,
        (Some(_), Some(_)) => {
            return Err(AppError::BadRequest(
                "'record' and 'payload' are mutually exclusive".to_string(),
            ))
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "one of 'record' or 'payload' is required".to_string(),
            ))
        }
    };

    let errors = if req.present_only {
        state
            .validator
            .as_ref()
            .clone()
            .with_absence_policy(AbsencePolicy::PresentOnly)
            .validate(&record, &schema)
    } else {
        state.validator.validate(&record, &schema)
    };

    Ok(Json(ValidateResponse {
        valid: errors.is_empty(),
        errors,
    }))
}

/// GET /v1/rules
async fn list_rules(State(state): State<AppState>) -> Json<RulesResponse> {
    Json(RulesResponse {
        rules: state
            .validator
            .registry()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
