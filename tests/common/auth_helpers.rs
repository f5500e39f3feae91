//! Authentication test helpers
//!
//! Fixture keys, token generation and an in-memory app wrapped in an
//! `axum_test::TestServer`.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header::AUTHORIZATION, HeaderValue};
use axum_test::{TestRequest, TestServer};
use chrono::Utc;
use serde_json::{json, Value};

use quillpost::backend::auth::{Authenticator, Claims, PasswordHasher, TokenGenerator};
use quillpost::backend::routes::create_router;
use quillpost::backend::server::AppState;
use quillpost::backend::store::MemoryStore;

pub const SIGNING_KEY: &str = include_str!("../fixtures/signing_key.pem");
pub const FOREIGN_KEY: &str = include_str!("../fixtures/foreign_key.pem");
pub const KEY_ID: &str = "test-key";

/// Password that passes validation
pub const PASSWORD: &str = "correct horse battery";

pub fn authenticator() -> Authenticator {
    Authenticator::from_private_key_pem(SIGNING_KEY.as_bytes(), KEY_ID, "RS256")
        .expect("fixture key should load")
}

/// A token for `username`, valid for an hour.
pub fn token_for(username: &str) -> String {
    let claims = Claims::new(username, Utc::now(), Duration::from_secs(3600));
    authenticator()
        .generate_token(&claims)
        .expect("Failed to generate test token")
}

/// A correctly signed token that expired yesterday.
pub fn expired_token_for(username: &str) -> String {
    let issued = Utc::now() - chrono::Duration::days(1);
    let claims = Claims::new(username, issued, Duration::from_secs(60));
    authenticator()
        .generate_token(&claims)
        .expect("Failed to generate test token")
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Attach a bearer token to a request
pub fn with_token(request: TestRequest, token: &str) -> TestRequest {
    let value = HeaderValue::from_str(&auth_header(token)).expect("token is a valid header value");
    request.add_header(AUTHORIZATION, value)
}

/// In-memory app with direct access to its store
pub struct TestApp {
    pub server: TestServer,
    pub store: MemoryStore,
}

pub fn test_app() -> TestApp {
    let store = MemoryStore::new();
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(authenticator()),
        PasswordHasher::new(4).expect("cost 4 is valid"),
        Duration::from_secs(3600),
    );
    let server = TestServer::new(create_router(state)).expect("Failed to start test server");
    TestApp { server, store }
}

impl TestApp {
    /// Register `username` (email `<username>@example.com`) and return its token.
    pub async fn signup(&self, username: &str) -> String {
        let response = self
            .server
            .post("/signup")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": PASSWORD,
            }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["token"].as_str().expect("token in response").to_string()
    }

    /// Create a post as the owner of `token` and return its id.
    pub async fn create_post(&self, token: &str, title: &str) -> i64 {
        let response = with_token(self.server.post("/posts"), token)
            .json(&json!({ "title": title, "body": "Lorem ipsum" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        body["id"].as_i64().expect("id in response")
    }
}
