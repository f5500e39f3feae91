/**
 * PostgreSQL Store
 *
 * Users and posts persisted with `sqlx`. The schema lives in `migrations/`
 * and is embedded with `sqlx::migrate!()`.
 *
 * Every call is bounded by the configured store timeout. A timeout surfaces
 * as `StoreError::Timeout`, which the HTTP layer reports as an internal
 * error rather than an authentication failure.
 */

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use crate::backend::auth::users::{NewUser, User};
use crate::backend::posts::model::{NewPost, Post};
use crate::backend::store::{PostRepository, StoreError, UserFinder, UserRegistry, UserTransaction};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";
const POST_COLUMNS: &str = "id, user_id, title, body, created_at, updated_at";

/// Run `fut`, failing with `StoreError::Timeout` once `limit` elapses.
async fn bounded<T, F>(limit: Duration, operation: &'static str, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => {
            tracing::error!(operation, "store call timed out after {:?}", limit);
            Err(StoreError::Timeout { operation })
        }
    }
}

/// PostgreSQL backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Open a pool for `database_url`.
    pub async fn connect(database_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(timeout)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool, timeout))
    }

    /// Apply the embedded migrations.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserFinder for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        tracing::debug!("find_user_by_email");
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        bounded(
            self.timeout,
            "find_user_by_email",
            sqlx::query_as::<_, User>(&query).bind(email).fetch_one(&self.pool),
        )
        .await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        tracing::debug!(username, "find_user_by_username");
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        bounded(
            self.timeout,
            "find_user_by_username",
            sqlx::query_as::<_, User>(&query).bind(username).fetch_one(&self.pool),
        )
        .await
    }
}

#[async_trait]
impl UserRegistry for PgStore {
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        bounded(
            self.timeout,
            "username_exists",
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        bounded(
            self.timeout,
            "email_exists",
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn create_user(
        &self,
        user: NewUser,
    ) -> Result<(User, Box<dyn UserTransaction>), StoreError> {
        let mut tx = bounded(self.timeout, "begin", self.pool.begin()).await?;

        let now = Utc::now();
        let query = format!(
            "INSERT INTO users (username, email, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) RETURNING {}",
            USER_COLUMNS
        );
        let created = bounded(
            self.timeout,
            "create_user",
            sqlx::query_as::<_, User>(&query)
                .bind(&user.username)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(now)
                .fetch_one(&mut *tx),
        )
        .await?;
        // On error `tx` is dropped here, which rolls the insert back.

        tracing::debug!(user_id = created.id, "user insert staged");
        Ok((
            created,
            Box::new(PgUserTransaction {
                tx,
                timeout: self.timeout,
            }),
        ))
    }
}

/// Open transaction holding an uncommitted user row.
///
/// Dropping it without calling `commit` aborts the transaction.
struct PgUserTransaction {
    tx: Transaction<'static, Postgres>,
    timeout: Duration,
}

#[async_trait]
impl UserTransaction for PgUserTransaction {
    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        bounded(self.timeout, "commit", self.tx.commit()).await
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        bounded(self.timeout, "rollback", self.tx.rollback()).await
    }
}

#[async_trait]
impl PostRepository for PgStore {
    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO posts (user_id, title, body, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) RETURNING {}",
            POST_COLUMNS
        );
        bounded(
            self.timeout,
            "create_post",
            sqlx::query_as::<_, Post>(&query)
                .bind(post.user_id)
                .bind(&post.title)
                .bind(&post.body)
                .bind(now)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn find_post(&self, id: i64) -> Result<Post, StoreError> {
        let query = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        bounded(
            self.timeout,
            "find_post",
            sqlx::query_as::<_, Post>(&query).bind(id).fetch_one(&self.pool),
        )
        .await
    }

    async fn update_post(&self, id: i64, title: &str, body: &str) -> Result<Post, StoreError> {
        let query = format!(
            "UPDATE posts SET title = $1, body = $2, updated_at = $3 WHERE id = $4 RETURNING {}",
            POST_COLUMNS
        );
        bounded(
            self.timeout,
            "update_post",
            sqlx::query_as::<_, Post>(&query)
                .bind(title)
                .bind(body)
                .bind(Utc::now())
                .bind(id)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn delete_post(&self, id: i64) -> Result<(), StoreError> {
        let result = bounded(
            self.timeout,
            "delete_post",
            sqlx::query("DELETE FROM posts WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let query = format!("SELECT {} FROM posts ORDER BY id", POST_COLUMNS);
        bounded(
            self.timeout,
            "list_posts",
            sqlx::query_as::<_, Post>(&query).fetch_all(&self.pool),
        )
        .await
    }
}
