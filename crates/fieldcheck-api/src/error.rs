//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps extraction and schema errors from `fieldcheck-core` to HTTP status
//! codes.
//!
//! Two body shapes are produced:
//!
//! - Validation failures (400) carry the per-field report:
//!   `{ "validation_errors": { field: message } }`.
//! - Everything else uses `{ "error": { "code", "message" } }`.
//!
//! Clients tell a failed record from other 400s by the `validation_errors` key.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fieldcheck_core::{ExtractionError, SchemaParseError};
use fieldcheck_schema::ErrorReport;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Body of a validation failure response.
#[derive(Debug, Serialize)]
pub struct ValidationErrorBody {
    pub validation_errors: ErrorReport,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing header, malformed payload, bad path or bad schema (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Unknown table or route resource (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The record failed validation (400, report body).
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(ErrorReport),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        match self {
            Self::Validation(report) => {
                tracing::debug!(failing_fields = report.len(), "record rejected");
                (
                    status,
                    Json(ValidationErrorBody {
                        validation_errors: report,
                    }),
                )
                    .into_response()
            }
            other => {
                let body = ErrorBody {
                    error: ErrorDetail {
                        code: code.to_string(),
                        message: other.to_string(),
                    },
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<SchemaParseError> for AppError {
    fn from(err: SchemaParseError) -> Self {
        Self::BadRequest(err.to_string())
    }
}
