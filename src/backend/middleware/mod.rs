//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - Bearer token authentication for protected routes
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//! use quillpost::backend::middleware::auth_middleware;
//!
//! let protected = Router::new()
//!     .route("/posts", post(create_post))
//!     .route_layer(from_fn_with_state(claims_parser, auth_middleware));
//! ```

pub mod auth;

pub use auth::{auth_middleware, parse_bearer, AuthUser};
