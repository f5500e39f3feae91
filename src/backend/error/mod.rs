//! Backend Error Module
//!
//! The HTTP boundary for errors. Flow errors (`SigninError`, `SignupError`,
//! `PostError`) and extractor rejections are converted into
//! [`BackendError`], which renders itself as a JSON response.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and the status mapping
//! └── conversion.rs - IntoResponse and extractor rejections
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use conversion::ErrorBody;
pub use types::BackendError;
