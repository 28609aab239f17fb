//! # Custom Extractors
//!
//! The `table_id` header extractor and a helper mapping JSON body
//! rejections to [`AppError::BadRequest`].

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::Json;

use crate::error::AppError;

/// Name of the header selecting the target table.
pub const TABLE_ID_HEADER: &str = "table_id";

/// The `table_id` request header, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for TableId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(TABLE_ID_HEADER)
            .ok_or_else(|| AppError::BadRequest(format!("missing '{TABLE_ID_HEADER}' header")))?;
        let value = raw
            .to_str()
            .map_err(|_| AppError::BadRequest(format!("'{TABLE_ID_HEADER}' header is not valid text")))?
            .trim();
        if value.is_empty() {
            return Err(AppError::BadRequest(format!("'{TABLE_ID_HEADER}' header is empty")));
        }
        Ok(Self(value.to_string()))
    }
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}
