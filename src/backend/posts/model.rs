/**
 * Post Model
 *
 * `Post` mirrors a row of the `posts` table. `PostForm` is the JSON body of
 * create and update requests.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::validation::{check_length, Validate, ValidationErrors};

/// Longest accepted post title, in characters.
pub const MAX_TITLE_LEN: usize = 50;

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    /// Owner. Set from the authenticated caller at creation, never changed.
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a post about to be inserted
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

/// Create/update request body
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl Validate for PostForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_length(&mut errors, "title", &self.title, 1, Some(MAX_TITLE_LEN));
        check_length(&mut errors, "body", &self.body, 1, None);
        errors.into_result()
    }
}

/// Response body of `GET /posts`
#[derive(Debug, Serialize, Deserialize)]
pub struct PostList {
    pub posts: Vec<Post>,
}
