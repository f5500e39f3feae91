/**
 * Post Handlers
 *
 * - `POST /posts` - create (authenticated)
 * - `GET /posts` - list
 * - `GET /posts/{id}` - find
 * - `PUT /posts/{id}` - update (authenticated, owner only)
 * - `DELETE /posts/{id}` - delete (authenticated, owner only)
 *
 * Authenticated handlers read the verified claims with the `AuthUser`
 * extractor; the route layer has already rejected unauthenticated calls.
 */

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::posts::model::{Post, PostForm, PostList};
use crate::backend::posts::service::PostService;

pub async fn create_post(
    State(posts): State<PostService>,
    AuthUser(claims): AuthUser,
    payload: Result<Json<PostForm>, JsonRejection>,
) -> Result<Json<Post>, BackendError> {
    let Json(form) = payload?;
    let post = posts.create(&claims, &form).await?;
    Ok(Json(post))
}

pub async fn list_posts(State(posts): State<PostService>) -> Result<Json<PostList>, BackendError> {
    let posts = posts.list().await?;
    Ok(Json(PostList { posts }))
}

pub async fn find_post(
    State(posts): State<PostService>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Post>, BackendError> {
    let Path(id) = id?;
    let post = posts.find(id).await?;
    Ok(Json(post))
}

pub async fn update_post(
    State(posts): State<PostService>,
    AuthUser(claims): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PostForm>, JsonRejection>,
) -> Result<Json<Post>, BackendError> {
    let Path(id) = id?;
    let Json(form) = payload?;
    let post = posts.update(&claims, id, &form).await?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(posts): State<PostService>,
    AuthUser(claims): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, BackendError> {
    let Path(id) = id?;
    posts.delete(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
