/**
 * Backend Error Types
 *
 * `BackendError` is the error every handler returns. The flow errors are
 * folded into it through `From` impls, which decide the HTTP status:
 *
 * | Variant        | Status | Produced by                                  |
 * |----------------|--------|----------------------------------------------|
 * | `BadRequest`   | 400    | malformed JSON, non-numeric path id          |
 * | `Unauthorized` | 401    | unknown email, wrong password, vanished user |
 * | `NotFound`     | 404    | missing post, post owned by someone else     |
 * | `Validation`   | 422    | form errors, username or email taken         |
 * | `Internal`     | 500    | store, hashing and signing failures          |
 *
 * Internal details are logged where the error is converted and never sent
 * to the client.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::signin::SigninError;
use crate::backend::auth::signup::SignupError;
use crate::backend::posts::service::PostError;
use crate::shared::validation::{ValidationErrors, VALIDATION_MESSAGE};

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("bad request")]
    BadRequest,

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// Per-field validation failures
    #[error("{}", VALIDATION_MESSAGE)]
    Validation(ValidationErrors),

    /// Anything the client cannot fix. The message is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BackendError {
    /// Log `err` and wrap it as an internal error.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        tracing::error!("internal error: {}", err);
        Self::Internal(err.to_string())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message
    pub fn message(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad request",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not found",
            Self::Validation(_) => VALIDATION_MESSAGE,
            Self::Internal(_) => "internal server error",
        }
    }
}

impl From<ValidationErrors> for BackendError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<SigninError> for BackendError {
    fn from(err: SigninError) -> Self {
        match err {
            SigninError::NotFound | SigninError::WrongPassword => Self::Unauthorized,
            other => Self::internal(other),
        }
    }
}

impl From<SignupError> for BackendError {
    fn from(err: SignupError) -> Self {
        match err {
            SignupError::Validation(errors) => Self::Validation(errors),
            SignupError::UsernameExists => {
                Self::Validation(ValidationErrors::single("username", "already taken"))
            }
            SignupError::EmailExists => {
                Self::Validation(ValidationErrors::single("email", "already registered"))
            }
            other => Self::internal(other),
        }
    }
}

impl From<PostError> for BackendError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::NotFound => Self::NotFound,
            PostError::Unauthorized => Self::Unauthorized,
            PostError::Validation(errors) => Self::Validation(errors),
            other => Self::internal(other),
        }
    }
}
