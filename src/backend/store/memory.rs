//! In-memory store
//!
//! [`MemoryStore`] keeps users and posts in ordered maps behind a
//! `tokio::sync::RwLock`. It backs the server when no `DATABASE_URL` is
//! configured and is what the test suite runs against.
//!
//! Ids are handed out sequentially, like a `BIGSERIAL` column. A user
//! returned by `create_user` is staged inside its transaction handle and is
//! only inserted on `commit`; uniqueness is checked again at that point, so
//! two racing sign-ups for the same username cannot both succeed.
//!
//! # Limitations
//!
//! - Data is lost when the process exits
//! - Ids consumed by rolled back sign-ups are not reused

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::backend::auth::users::{NewUser, User};
use crate::backend::posts::model::{NewPost, Post};
use crate::backend::store::{PostRepository, StoreError, UserFinder, UserRegistry, UserTransaction};

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    last_user_id: i64,
    last_post_id: i64,
}

impl Inner {
    fn duplicate_field(&self, username: &str, email: &str) -> Option<&'static str> {
        if self.users.values().any(|u| u.username == username) {
            Some("username")
        } else if self.users.values().any(|u| u.email == email) {
            Some("email")
        } else {
            None
        }
    }
}

/// In-memory store
///
/// Cheaply cloneable; all clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed users.
    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }

    /// Number of stored posts.
    pub async fn post_count(&self) -> usize {
        self.inner.read().await.posts.len()
    }
}

#[async_trait]
impl UserFinder for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let inner = self.inner.read().await;
        inner
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        let inner = self.inner.read().await;
        inner
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl UserRegistry for MemoryStore {
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().any(|u| u.username == username))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().any(|u| u.email == email))
    }

    async fn create_user(
        &self,
        user: NewUser,
    ) -> Result<(User, Box<dyn UserTransaction>), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(field) = inner.duplicate_field(&user.username, &user.email) {
            return Err(StoreError::Duplicate {
                field: field.to_string(),
            });
        }

        inner.last_user_id += 1;
        let now = Utc::now();
        let staged = User {
            id: inner.last_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };

        Ok((
            staged.clone(),
            Box::new(MemoryUserTransaction {
                inner: Arc::clone(&self.inner),
                staged,
            }),
        ))
    }
}

/// Staged user; dropping the handle discards it.
struct MemoryUserTransaction {
    inner: Arc<RwLock<Inner>>,
    staged: User,
}

#[async_trait]
impl UserTransaction for MemoryUserTransaction {
    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryUserTransaction { inner: shared, staged } = *self;
        let mut inner = shared.write().await;
        if let Some(field) = inner.duplicate_field(&staged.username, &staged.email) {
            return Err(StoreError::Duplicate {
                field: field.to_string(),
            });
        }
        inner.users.insert(staged.id, staged);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_post_id += 1;
        let now = Utc::now();
        let created = Post {
            id: inner.last_post_id,
            user_id: post.user_id,
            title: post.title,
            body: post.body,
            created_at: now,
            updated_at: now,
        };
        inner.posts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_post(&self, id: i64) -> Result<Post, StoreError> {
        let inner = self.inner.read().await;
        inner.posts.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update_post(&self, id: i64, title: &str, body: &str) -> Result<Post, StoreError> {
        let mut inner = self.inner.write().await;
        let post = inner.posts.get_mut(&id).ok_or(StoreError::NotFound)?;
        post.title = title.to_string();
        post.body = body.to_string();
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.posts.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.posts.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_user_is_visible_only_after_commit() {
        let store = MemoryStore::new();
        let (user, tx) = store.create_user(new_user("alice", "a@example.com")).await.unwrap();
        assert_eq!(user.id, 1);
        assert!(!store.username_exists("alice").await.unwrap());

        tx.commit().await.unwrap();
        assert!(store.username_exists("alice").await.unwrap());
        assert_eq!(store.find_user_by_email("a@example.com").await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_rollback_and_drop_discard_the_user() {
        let store = MemoryStore::new();
        let (_, tx) = store.create_user(new_user("alice", "a@example.com")).await.unwrap();
        tx.rollback().await.unwrap();

        let (_, tx) = store.create_user(new_user("bob", "b@example.com")).await.unwrap();
        drop(tx);

        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_racing_commits_keep_usernames_unique() {
        let store = MemoryStore::new();
        let (_, first) = store.create_user(new_user("alice", "a@example.com")).await.unwrap();
        let (_, second) = store.create_user(new_user("alice", "other@example.com")).await.unwrap();

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { ref field } if field == "username"));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_committed_duplicates() {
        let store = MemoryStore::new();
        let (_, tx) = store.create_user(new_user("alice", "a@example.com")).await.unwrap();
        tx.commit().await.unwrap();

        let err = store
            .create_user(new_user("bob", "a@example.com"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, StoreError::Duplicate { ref field } if field == "email"));
    }

    #[tokio::test]
    async fn test_post_lifecycle() {
        let store = MemoryStore::new();
        let post = store
            .create_post(NewPost {
                user_id: 7,
                title: "Hello".to_string(),
                body: "World".to_string(),
            })
            .await
            .unwrap();

        let updated = store.update_post(post.id, "Hi", "There").await.unwrap();
        assert_eq!(updated.user_id, 7);
        assert_eq!(updated.title, "Hi");
        assert_eq!(store.find_post(post.id).await.unwrap(), updated);

        store.delete_post(post.id).await.unwrap();
        assert!(matches!(store.find_post(post.id).await, Err(StoreError::NotFound)));
        assert!(matches!(store.delete_post(post.id).await, Err(StoreError::NotFound)));
        assert!(matches!(
            store.update_post(post.id, "x", "y").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let store = MemoryStore::new();
        for title in ["a", "b", "c"] {
            store
                .create_post(NewPost {
                    user_id: 1,
                    title: title.to_string(),
                    body: "body".to_string(),
                })
                .await
                .unwrap();
        }
        let ids: Vec<i64> = store.list_posts().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
