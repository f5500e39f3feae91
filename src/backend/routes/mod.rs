//! Route Configuration Module
//!
//! Configures the HTTP routes of the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation, layers, fallback
//! └── api_routes.rs   - Authentication and post endpoints
//! ```
//!
//! # Routes
//!
//! - `GET /health` - Liveness check
//! - `POST /signup`, `POST /signin` - Authentication
//! - `GET /posts`, `GET /posts/{id}` - Public reads
//! - `POST /posts`, `PUT /posts/{id}`, `DELETE /posts/{id}` - Behind the
//!   authentication middleware
//!
//! Unknown paths answer 404 with the usual JSON error body.

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
