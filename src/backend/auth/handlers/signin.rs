/**
 * Signin Handler
 *
 * `POST /signin`. Exchanges an email and password for a token.
 *
 * An unknown email and a wrong password both answer 401 with the same body.
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::backend::auth::handlers::types::{SigninForm, TokenResponse};
use crate::backend::auth::signin::SigninService;
use crate::backend::error::BackendError;

/// Sign in handler
pub async fn signin(
    State(service): State<SigninService>,
    payload: Result<Json<SigninForm>, JsonRejection>,
) -> Result<Json<TokenResponse>, BackendError> {
    let Json(form) = payload?;
    let token = service.signin(&form.email, &form.password).await?;
    Ok(Json(TokenResponse { token }))
}
