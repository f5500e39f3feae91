//! Authentication Module
//!
//! User registration, sign-in, password hashing and the JWTs that carry a
//! user's identity between requests.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model
//! ├── sessions.rs     - Token issuing and verification
//! ├── passwords.rs    - bcrypt hashing
//! ├── signin.rs       - Sign-in flow
//! ├── signup.rs       - Sign-up flow
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     ├── types.rs    - Request/response types
//!     ├── signup.rs   - User registration handler
//!     └── signin.rs   - User authentication handler
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Signup**: username, email and password → user created → token returned
//! 2. **Signin**: email and password → credentials verified → token returned
//! 3. **Protected routes**: `Authorization: Bearer <token>` → token verified
//!    by the middleware → claims available to the handler
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage
//! - Tokens are RSA signed; the verification key is chosen by `kid` from a
//!   fixed table, never from the token itself
//! - Tokens expire after 24 hours by default
//! - Invalid credentials return 401 without saying which check failed

/// User data model
pub mod users;

/// Token issuing and verification
pub mod sessions;

/// Password hashing
pub mod passwords;

/// Sign-in flow
pub mod signin;

/// Sign-up flow
pub mod signup;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::types::{SigninForm, SignupForm, TokenResponse};
pub use passwords::{PasswordError, PasswordHasher};
pub use sessions::{
    Authenticator, Claims, ClaimsParser, PublicKeyLookup, SingleKeyLookup, TokenError,
    TokenGenerator,
};
pub use signin::{SigninError, SigninService};
pub use signup::{SignupError, SignupService};
