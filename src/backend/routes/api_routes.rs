/**
 * API Routes
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /signup` - User registration
 * - `POST /signin` - User sign-in
 *
 * ## Posts
 * - `GET /posts` - List posts
 * - `GET /posts/{id}` - Find a post
 * - `POST /posts` - Create a post (requires authentication)
 * - `PUT /posts/{id}` - Update a post (requires authentication)
 * - `DELETE /posts/{id}` - Delete a post (requires authentication)
 *
 * The authentication middleware is applied per route: the protected routes
 * live on their own router with a `route_layer`, which is then merged with
 * the public routes sharing the same paths.
 */

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use crate::backend::auth::handlers::{signin, signup};
use crate::backend::auth::sessions::ClaimsParser;
use crate::backend::middleware::auth_middleware;
use crate::backend::posts::handlers::{create_post, delete_post, find_post, list_posts, update_post};
use crate::backend::server::state::AppState;

pub fn configure_api_routes(
    router: Router<AppState>,
    claims_parser: Arc<dyn ClaimsParser>,
) -> Router<AppState> {
    let protected = Router::new()
        .route("/posts", post(create_post))
        .route("/posts/{id}", put(update_post).delete(delete_post))
        .route_layer(from_fn_with_state(claims_parser, auth_middleware));

    router
        // Authentication endpoints
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        // Public post endpoints
        .route("/posts", get(list_posts))
        .route("/posts/{id}", get(find_post))
        .merge(protected)
}
