/**
 * Authentication Middleware
 *
 * Protects individual routes. The middleware reads the bearer token from
 * the `Authorization` header, verifies it, and stores the resulting
 * `Claims` in the request extensions for the handler. It never touches the
 * store.
 *
 * Every failure is a 401 with the same body; the log line says which check
 * failed, the client is not told.
 */

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::sessions::{Claims, ClaimsParser};
use crate::backend::error::BackendError;

/// Pull the token out of an `Authorization` header value.
///
/// Accepts exactly `<scheme> <token>` with a single space and a
/// case-insensitive `bearer` scheme.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let parts: Vec<&str> = header.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => Some(token),
        _ => None,
    }
}

/// Authentication middleware
///
/// 1. Extracts the bearer token from the Authorization header
/// 2. Verifies it with the configured `ClaimsParser`
/// 3. Inserts the `Claims` into the request extensions
///
/// Returns 401 Unauthorized if the token is missing or invalid; the next
/// stage does not run in that case.
pub async fn auth_middleware(
    State(parser): State<Arc<dyn ClaimsParser>>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| {
            tracing::warn!("missing Authorization header");
            BackendError::Unauthorized
        })?
        .to_str()
        .map_err(|_| {
            tracing::warn!("Authorization header is not visible ASCII");
            BackendError::Unauthorized
        })?;

    let token = parse_bearer(header).ok_or_else(|| {
        tracing::warn!("malformed Authorization header");
        BackendError::Unauthorized
    })?;

    let claims = parser.parse_claims(token).map_err(|e| {
        tracing::warn!("rejected token: {}", e);
        BackendError::Unauthorized
    })?;

    tracing::debug!(subject = %claims.sub, "request authenticated");
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Axum extractor for the claims set by [`auth_middleware`]
///
/// Rejects with 401 on a route the middleware was not applied to.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts.extensions.get::<Claims>().cloned().ok_or_else(|| {
            tracing::warn!("Claims not found in request extensions");
            BackendError::Unauthorized
        })?;

        Ok(AuthUser(claims))
    }
}
