/**
 * Authentication Handler Types
 *
 * Request and response bodies for `POST /signup` and `POST /signin`.
 * Passwords are redacted from `Debug` output so the forms can be logged.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::validation::{check_email, check_length, Validate, ValidationErrors};

/// Longest accepted username, in characters.
pub const MAX_USERNAME_LEN: usize = 50;
/// Longest accepted email, in characters.
pub const MAX_EMAIL_LEN: usize = 255;
/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 10;

/// Sign up request
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    /// Hashed before storage, never echoed back
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Validate for SignupForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_length(&mut errors, "username", &self.username, 1, Some(MAX_USERNAME_LEN));
        check_email(&mut errors, "email", &self.email, MAX_EMAIL_LEN);
        check_length(&mut errors, "password", &self.password, MIN_PASSWORD_LEN, None);
        errors.into_result()
    }
}

/// Sign in request
#[derive(Deserialize, Serialize, Clone, Default)]
pub struct SigninForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for SigninForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigninForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Returned by sign-up and sign-in
#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, email: &str, password: &str) -> SignupForm {
        SignupForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_signup_form() {
        assert!(form("alice", "alice@example.com", "0123456789").validate().is_ok());
    }

    #[test]
    fn test_signup_form_reports_every_field() {
        let errors = form("", "alice", "short").validate().unwrap_err();
        assert_eq!(errors.get("username"), Some("cannot be blank"));
        assert_eq!(errors.get("email"), Some("must be a valid email address"));
        assert_eq!(errors.get("password"), Some("must be at least 10 characters"));
    }

    #[test]
    fn test_username_length_limit() {
        let long = "u".repeat(MAX_USERNAME_LEN + 1);
        let errors = form(&long, "a@example.com", "0123456789").validate().unwrap_err();
        assert_eq!(errors.get("username"), Some("must be at most 50 characters"));
    }

    #[test]
    fn test_email_fits_users_column() {
        let long = format!("{}@example.com", "a".repeat(300));
        let errors = form("alice", &long, "0123456789").validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("must be at most 255 characters"));
        assert_eq!(errors.get("username"), None);
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", form("alice", "a@example.com", "hunter2hunter2"));
        assert!(!rendered.contains("hunter2"));
        let rendered = format!(
            "{:?}",
            SigninForm {
                email: "a@example.com".to_string(),
                password: "hunter2hunter2".to_string(),
            }
        );
        assert!(!rendered.contains("hunter2"));
    }
}
