/**
 * Sign-up Flow
 *
 * # Registration Process
 *
 * 1. Validate the form
 * 2. Reject a taken username, then a taken email
 * 3. Hash the password
 * 4. Insert the user inside a transaction
 * 5. Issue a token for the new user, then commit
 *
 * Persistence is all-or-nothing: if the token cannot be issued the insert is
 * rolled back, so a client never ends up with an account it has no token
 * for. A unique violation raised by the store (a concurrent sign-up won the
 * race) is reported the same way as the up-front checks.
 */

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use crate::backend::auth::handlers::types::SignupForm;
use crate::backend::auth::passwords::{PasswordError, PasswordHasher};
use crate::backend::auth::sessions::{Claims, TokenError, TokenGenerator};
use crate::backend::auth::users::NewUser;
use crate::backend::store::{StoreError, UserRegistry};
use crate::shared::{Validate, ValidationErrors};

/// Sign-up errors
#[derive(Debug, Error)]
pub enum SignupError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("username already taken")]
    UsernameExists,
    #[error("email already registered")]
    EmailExists,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<StoreError> for SignupError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { ref field } if field == "username" => SignupError::UsernameExists,
            StoreError::Duplicate { ref field } if field == "email" => SignupError::EmailExists,
            other => SignupError::Store(other),
        }
    }
}

/// Registers users and issues their first token
#[derive(Clone)]
pub struct SignupService {
    users: Arc<dyn UserRegistry>,
    passwords: PasswordHasher,
    tokens: Arc<dyn TokenGenerator>,
    token_ttl: Duration,
}

impl SignupService {
    pub fn new(
        users: Arc<dyn UserRegistry>,
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

    #[tracing::instrument(skip(self, form), fields(username = %form.username))]
    pub async fn signup(&self, form: &SignupForm) -> Result<String, SignupError> {
        form.validate()?;

        if self.users.username_exists(&form.username).await? {
            tracing::warn!("username already taken");
            return Err(SignupError::UsernameExists);
        }
        if self.users.email_exists(&form.email).await? {
            tracing::warn!("email already registered");
            return Err(SignupError::EmailExists);
        }

        let password_hash = self.passwords.hash(&form.password)?;
        let (user, tx) = self
            .users
            .create_user(NewUser {
                username: form.username.clone(),
                email: form.email.clone(),
                password_hash,
            })
            .await?;

        let claims = Claims::new(user.username.as_str(), Utc::now(), self.token_ttl);
        let token = match self.tokens.generate_token(&claims) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!("issuing token for new user failed: {}", e);
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!("rolling back sign-up failed: {}", rollback_err);
                }
                return Err(e.into());
            }
        };

        tx.commit().await?;

        tracing::info!(user_id = user.id, "user created");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::users::User;
    use crate::backend::store::{MemoryStore, UserFinder, UserTransaction};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct EchoTokens;

    impl TokenGenerator for EchoTokens {
        fn generate_token(&self, claims: &Claims) -> Result<String, TokenError> {
            Ok(format!("token-for-{}", claims.sub))
        }
    }

    struct FailingTokens;

    impl TokenGenerator for FailingTokens {
        fn generate_token(&self, _claims: &Claims) -> Result<String, TokenError> {
            Err(TokenError::Signing(
                jsonwebtoken::errors::ErrorKind::InvalidKeyFormat.into(),
            ))
        }
    }

    fn form(username: &str, email: &str) -> SignupForm {
        SignupForm {
            username: username.to_string(),
            email: email.to_string(),
            password: "0123456789".to_string(),
        }
    }

    fn service(store: &MemoryStore, tokens: Arc<dyn TokenGenerator>) -> SignupService {
        SignupService::new(
            Arc::new(store.clone()),
            PasswordHasher::new(4).unwrap(),
            tokens,
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_signup_persists_user_and_returns_token() {
        let store = MemoryStore::new();
        let token = service(&store, Arc::new(EchoTokens))
            .signup(&form("alice", "alice@example.com"))
            .await
            .unwrap();
        assert_eq!(token, "token-for-alice");

        let user = store.find_user_by_username("alice").await.unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_ne!(user.password_hash, "0123456789");
    }

    #[tokio::test]
    async fn test_duplicate_username_adds_no_row() {
        let store = MemoryStore::new();
        let service = service(&store, Arc::new(EchoTokens));
        service.signup(&form("alice", "alice@example.com")).await.unwrap();

        let err = service.signup(&form("alice", "other@example.com")).await.unwrap_err();
        assert!(matches!(err, SignupError::UsernameExists));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let store = MemoryStore::new();
        let service = service(&store, Arc::new(EchoTokens));
        service.signup(&form("alice", "alice@example.com")).await.unwrap();

        let err = service.signup(&form("bob", "alice@example.com")).await.unwrap_err();
        assert!(matches!(err, SignupError::EmailExists));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_form_touches_nothing() {
        let store = MemoryStore::new();
        let err = service(&store, Arc::new(EchoTokens))
            .signup(&form("", "nope"))
            .await
            .unwrap_err();
        match err {
            SignupError::Validation(errors) => {
                assert!(errors.get("username").is_some());
                assert!(errors.get("email").is_some());
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_rolls_back_when_token_issuance_fails() {
        let store = MemoryStore::new();
        let err = service(&store, Arc::new(FailingTokens))
            .signup(&form("alice", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, SignupError::Token(_)));
        assert_eq!(store.user_count().await, 0);
        assert!(!store.username_exists("alice").await.unwrap());
    }

    #[test]
    fn test_store_duplicates_map_to_sentinels() {
        let username: SignupError = StoreError::Duplicate { field: "username".into() }.into();
        let email: SignupError = StoreError::Duplicate { field: "email".into() }.into();
        let other: SignupError = StoreError::NotFound.into();
        assert!(matches!(username, SignupError::UsernameExists));
        assert!(matches!(email, SignupError::EmailExists));
        assert!(matches!(other, SignupError::Store(StoreError::NotFound)));
    }

    /// Registry whose transactions fail to roll back.
    struct BrokenRollback {
        rolled_back: Arc<AtomicBool>,
    }

    struct BrokenTransaction {
        rolled_back: Arc<AtomicBool>,
    }

    #[async_trait]
    impl UserTransaction for BrokenTransaction {
        async fn commit(self: Box<Self>) -> Result<(), StoreError> {
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
            self.rolled_back.store(true, Ordering::SeqCst);
            Err(StoreError::Timeout { operation: "rollback" })
        }
    }

    #[async_trait]
    impl UserRegistry for BrokenRollback {
        async fn username_exists(&self, _username: &str) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn email_exists(&self, _email: &str) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn create_user(
            &self,
            user: NewUser,
        ) -> Result<(User, Box<dyn UserTransaction>), StoreError> {
            let now = Utc::now();
            let created = User {
                id: 1,
                username: user.username,
                email: user.email,
                password_hash: user.password_hash,
                created_at: now,
                updated_at: now,
            };
            let tx = BrokenTransaction {
                rolled_back: Arc::clone(&self.rolled_back),
            };
            Ok((created, Box::new(tx)))
        }
    }

    #[tokio::test]
    async fn test_rollback_failure_is_swallowed() {
        let rolled_back = Arc::new(AtomicBool::new(false));
        let service = SignupService::new(
            Arc::new(BrokenRollback {
                rolled_back: Arc::clone(&rolled_back),
            }),
            PasswordHasher::new(4).unwrap(),
            Arc::new(FailingTokens),
            Duration::from_secs(60),
        );

        let err = service.signup(&form("alice", "alice@example.com")).await.unwrap_err();
        assert!(matches!(err, SignupError::Token(_)));
        assert!(rolled_back.load(Ordering::SeqCst));
    }
}
