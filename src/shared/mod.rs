//! Shared Module
//!
//! Types used by every layer of the service: the startup configuration and
//! the form validation helpers. Nothing in here touches the network or the
//! database.

/// Application configuration
pub mod config;

/// Form validation
pub mod validation;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use validation::{Validate, ValidationErrors};
