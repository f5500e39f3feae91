/**
 * Application State Management
 *
 * `AppState` is the central state container. Every field is cheap to clone
 * (`Arc`s and services holding `Arc`s), and nothing in it is mutable except
 * the store behind the services.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers extract only the service they
 * use, e.g. `State(posts): State<PostService>`.
 */

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;

use crate::backend::auth::passwords::PasswordHasher;
use crate::backend::auth::sessions::{Authenticator, ClaimsParser};
use crate::backend::auth::signin::SigninService;
use crate::backend::auth::signup::SignupService;
use crate::backend::posts::ability::OwnerAbility;
use crate::backend::posts::service::PostService;
use crate::backend::store::{PostRepository, UserFinder, UserRegistry};

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Token verifier used by the authentication middleware
    pub claims_parser: Arc<dyn ClaimsParser>,
    pub signup: SignupService,
    pub signin: SigninService,
    pub posts: PostService,
}

impl AppState {
    /// Wire the services to one store and one authenticator.
    pub fn new<S>(
        store: Arc<S>,
        authenticator: Arc<Authenticator>,
        passwords: PasswordHasher,
        token_ttl: Duration,
    ) -> Self
    where
        S: UserFinder + UserRegistry + PostRepository + 'static,
    {
        let finder: Arc<dyn UserFinder> = store.clone();
        let registry: Arc<dyn UserRegistry> = store.clone();
        let repository: Arc<dyn PostRepository> = store;

        Self {
            claims_parser: authenticator.clone(),
            signup: SignupService::new(registry, passwords, authenticator.clone(), token_ttl),
            signin: SigninService::new(finder.clone(), passwords, authenticator, token_ttl),
            posts: PostService::new(repository, finder, Arc::new(OwnerAbility)),
        }
    }
}

impl FromRef<AppState> for Arc<dyn ClaimsParser> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.claims_parser.clone()
    }
}

impl FromRef<AppState> for SignupService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.signup.clone()
    }
}

impl FromRef<AppState> for SigninService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.signin.clone()
    }
}

impl FromRef<AppState> for PostService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.posts.clone()
    }
}
