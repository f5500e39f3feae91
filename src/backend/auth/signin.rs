/**
 * Sign-in Flow
 *
 * 1. Look the user up by email
 * 2. Compare the password against the stored bcrypt hash
 * 3. Issue a token whose subject is the username
 *
 * Nothing is written on any path.
 */

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use crate::backend::auth::passwords::{PasswordError, PasswordHasher};
use crate::backend::auth::sessions::{Claims, TokenError, TokenGenerator};
use crate::backend::store::{StoreError, UserFinder};

/// Sign-in errors
///
/// `NotFound` and `WrongPassword` are the sentinels callers branch on.
#[derive(Debug, Error)]
pub enum SigninError {
    #[error("no user registered with that email")]
    NotFound,
    #[error("wrong password")]
    WrongPassword,
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<StoreError> for SigninError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => SigninError::NotFound,
            other => SigninError::Store(other),
        }
    }
}

/// Exchanges an email and password for a token
#[derive(Clone)]
pub struct SigninService {
    users: Arc<dyn UserFinder>,
    passwords: PasswordHasher,
    tokens: Arc<dyn TokenGenerator>,
    token_ttl: Duration,
}

impl SigninService {
    pub fn new(
        users: Arc<dyn UserFinder>,
        passwords: PasswordHasher,
        tokens: Arc<dyn TokenGenerator>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
            token_ttl,
        }
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn signin(&self, email: &str, password: &str) -> Result<String, SigninError> {
        let user = self.users.find_user_by_email(email).await?;

        if !self.passwords.compare(&user.password_hash, password)? {
            tracing::warn!(user_id = user.id, "password mismatch");
            return Err(SigninError::WrongPassword);
        }

        let claims = Claims::new(user.username.as_str(), Utc::now(), self.token_ttl);
        let token = self.tokens.generate_token(&claims)?;

        tracing::info!(user_id = user.id, "user signed in");
        Ok(token)
    }
}
