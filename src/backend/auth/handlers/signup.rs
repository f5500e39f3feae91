/**
 * Signup Handler
 *
 * `POST /signup`. Registers a user and returns a token for immediate use.
 *
 * # Errors
 *
 * * `400 Bad Request` - body is not a JSON object
 * * `422 Unprocessable Entity` - invalid fields, username or email taken
 * * `500 Internal Server Error` - store, hashing or signing failure
 *
 * # Example Request
 *
 * ```http
 * POST /signup HTTP/1.1
 * Content-Type: application/json
 *
 * {"username": "alice", "email": "alice@example.com", "password": "correct horse"}
 * ```
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::backend::auth::handlers::types::{SignupForm, TokenResponse};
use crate::backend::auth::signup::SignupService;
use crate::backend::error::BackendError;

/// Sign up handler
pub async fn signup(
    State(service): State<SignupService>,
    payload: Result<Json<SignupForm>, JsonRejection>,
) -> Result<Json<TokenResponse>, BackendError> {
    let Json(form) = payload?;
    let token = service.signup(&form).await?;
    Ok(Json(TokenResponse { token }))
}
