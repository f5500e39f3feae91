//! Posts Module
//!
//! Blog posts and the rule deciding who may change them.
//!
//! # Module Structure
//!
//! ```text
//! posts/
//! ├── mod.rs      - Module exports and documentation
//! ├── model.rs    - Post, NewPost, PostForm
//! ├── ability.rs  - Ownership check for update and delete
//! ├── service.rs  - Create, find, list, update, delete
//! └── handlers.rs - HTTP handlers
//! ```
//!
//! # Authorization
//!
//! Reads are public. Creating requires a valid token; the new post belongs
//! to the token's user. Updating and deleting additionally require the
//! caller to own the post, and a post owned by someone else is reported as
//! not found so clients cannot probe for other users' posts.

/// Post data types
pub mod model;

/// Ownership checks
pub mod ability;

/// Post flows
pub mod service;

/// HTTP handlers
pub mod handlers;

pub use ability::{OwnerAbility, PostAbility};
pub use model::{NewPost, Post, PostForm, PostList};
pub use service::{PostError, PostService};
