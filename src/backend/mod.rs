//! Backend Module
//!
//! All server-side code for the quillpost blogging API: an Axum HTTP server
//! with JWT authentication, per-route authorization and a PostgreSQL (or
//! in-memory) credential store.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Tokens, passwords, sign-in and sign-up
//! - **`middleware`** - Bearer token authentication
//! - **`posts`** - Posts, the ownership check and their handlers
//! - **`store`** - Credential store traits and backends
//! - **`error`** - Backend error type and HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - quillpost-server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── posts/          - Blog posts
//! ├── store/          - Persistence
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! ```text
//! request → [auth middleware, protected routes only] → handler → service
//!         → store → [ownership check, update/delete only] → response
//! ```
//!
//! # Thread Safety
//!
//! - Signing keys live in an `Arc<Authenticator>` and are never mutated
//! - Services are `Clone` and hold `Arc<dyn Trait>` collaborators
//! - `PgPool` and `MemoryStore` are safe to share between requests
//! - Verified claims travel in the extensions of their own request only

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Blog posts
pub mod posts;

/// Credential store
pub mod store;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::{create_app, AppState, StartupError};
