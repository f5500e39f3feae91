//! Common test utilities and helpers
//!
//! Shared by the integration tests:
//! - Fixture keys, tokens and an in-memory test app
//! - PostgreSQL fixture (used only when `DATABASE_URL` is set)
//! - Custom assertion macros

#![allow(dead_code)]

pub mod assertions;
pub mod auth_helpers;
pub mod database;

// Re-export commonly used utilities
pub use auth_helpers::*;
