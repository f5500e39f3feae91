/**
 * Error Conversion
 *
 * `IntoResponse` for `BackendError`, plus the rejection mapping for axum's
 * extractors so malformed requests get the same JSON shape.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "message": "you have validation errors",
 *   "status": 422,
 *   "errors": { "title": "cannot be blank" }
 * }
 * ```
 *
 * `errors` is present only for validation failures.
 */

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::backend::error::types::BackendError;
use crate::shared::ValidationErrors;

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub message: &'a str,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a ValidationErrors>,
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let errors = match &self {
            BackendError::Validation(errors) => Some(errors),
            _ => None,
        };
        let body = ErrorBody {
            message: self.message(),
            status: status.as_u16(),
            errors,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("rejected request body: {}", rejection.body_text());
        BackendError::BadRequest
    }
}

impl From<PathRejection> for BackendError {
    fn from(rejection: PathRejection) -> Self {
        tracing::warn!("rejected path parameter: {}", rejection.body_text());
        BackendError::BadRequest
    }
}
