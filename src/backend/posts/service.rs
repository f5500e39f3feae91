/**
 * Post Flows
 *
 * Create, find, list, update and delete. The caller's identity arrives as
 * the `Claims` the authentication middleware verified; its subject is
 * resolved to a user id through the store on every mutating call.
 *
 * A post the caller does not own is reported as `NotFound`, exactly like a
 * post that does not exist.
 */

use std::sync::Arc;

use thiserror::Error;

use crate::backend::auth::sessions::Claims;
use crate::backend::posts::ability::PostAbility;
use crate::backend::posts::model::{NewPost, Post, PostForm};
use crate::backend::store::{PostRepository, StoreError, UserFinder};
use crate::shared::{Validate, ValidationErrors};

/// Post flow errors
#[derive(Debug, Error)]
pub enum PostError {
    /// Missing post, or a post the caller may not touch
    #[error("post not found")]
    NotFound,
    /// The token's subject no longer names a user
    #[error("caller not found")]
    Unauthorized,
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for PostError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => PostError::NotFound,
            other => PostError::Store(other),
        }
    }
}

/// Post operations
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserFinder>,
    ability: Arc<dyn PostAbility>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserFinder>,
        ability: Arc<dyn PostAbility>,
    ) -> Self {
        Self {
            posts,
            users,
            ability,
        }
    }

    async fn caller_id(&self, claims: &Claims) -> Result<i64, PostError> {
        match self.users.find_user_by_username(claims.subject()).await {
            Ok(user) => Ok(user.id),
            Err(StoreError::NotFound) => {
                tracing::warn!(subject = %claims.sub, "token subject has no user");
                Err(PostError::Unauthorized)
            }
            Err(e) => Err(PostError::Store(e)),
        }
    }

    #[tracing::instrument(skip(self, claims, form), fields(subject = %claims.sub))]
    pub async fn create(&self, claims: &Claims, form: &PostForm) -> Result<Post, PostError> {
        form.validate()?;
        let user_id = self.caller_id(claims).await?;

        let post = self
            .posts
            .create_post(NewPost {
                user_id,
                title: form.title.clone(),
                body: form.body.clone(),
            })
            .await?;

        tracing::info!(post_id = post.id, "post created");
        Ok(post)
    }

    pub async fn find(&self, id: i64) -> Result<Post, PostError> {
        Ok(self.posts.find_post(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<Post>, PostError> {
        Ok(self.posts.list_posts().await?)
    }

    #[tracing::instrument(skip(self, claims, form), fields(subject = %claims.sub))]
    pub async fn update(&self, claims: &Claims, id: i64, form: &PostForm) -> Result<Post, PostError> {
        form.validate()?;
        let post = self.posts.find_post(id).await?;
        let user_id = self.caller_id(claims).await?;

        if !self.ability.can_update(user_id, &post) {
            tracing::warn!(user_id, owner = post.user_id, "update denied");
            return Err(PostError::NotFound);
        }

        let updated = self.posts.update_post(id, &form.title, &form.body).await?;
        tracing::info!(post_id = id, "post updated");
        Ok(updated)
    }

    #[tracing::instrument(skip(self, claims), fields(subject = %claims.sub))]
    pub async fn delete(&self, claims: &Claims, id: i64) -> Result<(), PostError> {
        let post = self.posts.find_post(id).await?;
        let user_id = self.caller_id(claims).await?;

        if !self.ability.can_delete(user_id, &post) {
            tracing::warn!(user_id, owner = post.user_id, "delete denied");
            return Err(PostError::NotFound);
        }

        self.posts.delete_post(id).await?;
        tracing::info!(post_id = id, "post deleted");
        Ok(())
    }
}
