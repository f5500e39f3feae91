//! Quillpost - Blogging API Library
//!
//! Quillpost is a small blogging service built on Axum: users register and
//! sign in with an email and password, receive an RSA-signed JWT, and use it
//! to create, update and delete their own posts.
//!
//! # Module Structure
//!
//! - **`shared`** - Types used by every layer
//!   - Application configuration (`AppConfig`, `ConfigError`)
//!   - Form validation (`ValidationErrors`, `Validate`)
//!
//! - **`backend`** - Server-side code
//!   - Token issuing and verification, password hashing
//!   - Sign-in and sign-up flows
//!   - Authentication middleware and the post ownership check
//!   - Credential store (PostgreSQL and in-memory)
//!   - Axum router, handlers and error mapping
//!
//! # Usage
//!
//! ```rust,no_run
//! use quillpost::backend::server::create_app;
//! use quillpost::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(&config).await?;
//! let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! Signing keys are loaded once and shared read-only behind `Arc`. The only
//! shared mutable resource is the credential store (`PgPool`, or the
//! in-memory store behind `tokio::sync::RwLock`). Identity claims live in the
//! request extensions of a single request and are never cached.

/// Types shared by all layers
pub mod shared;

/// Backend server-side code
pub mod backend;
