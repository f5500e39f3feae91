//! Credential Store
//!
//! Persistence for users and posts, behind narrow traits so the flows can be
//! built against either backend (or a test double).
//!
//! # Backends
//!
//! - **`postgres`** - [`PgStore`], a `sqlx::PgPool` with embedded migrations
//! - **`memory`** - [`MemoryStore`], maps behind a `tokio::sync::RwLock`
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs      - Traits and StoreError
//! ├── postgres.rs - PostgreSQL backend
//! └── memory.rs   - In-memory backend
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::backend::auth::users::{NewUser, User};
use crate::backend::posts::model::{NewPost, Post};

/// PostgreSQL backend
pub mod postgres;

/// In-memory backend
pub mod memory;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested row does not exist
    #[error("record not found")]
    NotFound,

    /// A unique constraint on `field` was violated
    #[error("duplicate value for {field}")]
    Duplicate { field: String },

    /// The call did not finish within the configured timeout
    #[error("store call {operation} timed out")]
    Timeout { operation: &'static str },

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                let field = db_err
                    .constraint()
                    .and_then(field_for_constraint)
                    .unwrap_or("unknown");
                StoreError::Duplicate {
                    field: field.to_string(),
                }
            }
            other => StoreError::Database(other),
        }
    }
}

/// Unique constraint names created by the migrations.
fn field_for_constraint(constraint: &str) -> Option<&'static str> {
    match constraint {
        "users_username_key" => Some("username"),
        "users_email_key" => Some("email"),
        _ => None,
    }
}

/// Looks users up for sign-in and identity resolution.
#[async_trait]
pub trait UserFinder: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<User, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<User, StoreError>;
}

/// Registers new users.
#[async_trait]
pub trait UserRegistry: Send + Sync {
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    /// Insert a user inside a transaction. The user is not visible to other
    /// callers until the returned handle is committed.
    async fn create_user(
        &self,
        user: NewUser,
    ) -> Result<(User, Box<dyn UserTransaction>), StoreError>;
}

/// Pending user creation. Each method consumes the handle.
#[async_trait]
pub trait UserTransaction: Send {
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

/// Post persistence.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError>;
    async fn find_post(&self, id: i64) -> Result<Post, StoreError>;
    async fn update_post(&self, id: i64, title: &str, body: &str) -> Result<Post, StoreError>;
    async fn delete_post(&self, id: i64) -> Result<(), StoreError>;
    /// All posts, ordered by id.
    async fn list_posts(&self) -> Result<Vec<Post>, StoreError>;
}
