/**
 * Router Configuration
 *
 * Combines the API routes with the health check, the fallback and the
 * router-wide layers (request tracing and CORS).
 */

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> BackendError {
    BackendError::NotFound
}

pub fn create_router(app_state: AppState) -> Router<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let router = Router::new().route("/health", get(health));

    // Add API routes
    let router = configure_api_routes(router, app_state.claims_parser.clone());

    // Fallback handler for 404
    let router = router.fallback(not_found);

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
