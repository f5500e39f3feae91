//! Property-based tests for ownership checks and token subjects

mod common;

use std::time::Duration;

use chrono::Utc;
use proptest::prelude::*;

use common::authenticator;
use quillpost::backend::auth::{Claims, ClaimsParser, TokenGenerator};
use quillpost::backend::middleware::parse_bearer;
use quillpost::backend::posts::{OwnerAbility, Post, PostAbility};

fn post_owned_by(user_id: i64) -> Post {
    let now = Utc::now();
    Post {
        id: 1,
        user_id,
        title: "title".to_string(),
        body: "body".to_string(),
        created_at: now,
        updated_at: now,
    }
}

proptest! {
    #[test]
    fn test_update_allowed_only_for_owner(caller in any::<i64>(), owner in any::<i64>()) {
        let post = post_owned_by(owner);
        prop_assert_eq!(OwnerAbility.can_update(caller, &post), caller == owner);
    }

    #[test]
    fn test_delete_allowed_only_for_owner(caller in any::<i64>(), owner in any::<i64>()) {
        let post = post_owned_by(owner);
        prop_assert_eq!(OwnerAbility.can_delete(caller, &post), caller == owner);
    }

    #[test]
    fn test_owner_always_allowed(owner in any::<i64>()) {
        let post = post_owned_by(owner);
        prop_assert!(OwnerAbility.can_update(owner, &post));
        prop_assert!(OwnerAbility.can_delete(owner, &post));
    }

    #[test]
    fn test_bearer_without_single_space_is_rejected(token in "[A-Za-z0-9._-]{1,40}") {
        let header = format!("Bearer {}", token);
        prop_assert_eq!(parse_bearer(&header), Some(token.as_str()));
        let double_space = format!("Bearer  {}", token);
        prop_assert_eq!(parse_bearer(&double_space), None);
        prop_assert_eq!(parse_bearer(&token), None);
    }
}

proptest! {
    // RSA signing is slow; a handful of subjects is enough.
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_token_preserves_subject(subject in "[a-zA-Z0-9_]{1,50}") {
        let auth = authenticator();
        let claims = Claims::new(subject.clone(), Utc::now(), Duration::from_secs(60));
        let token = auth.generate_token(&claims).unwrap();
        let parsed = auth.parse_claims(&token).unwrap();

        prop_assert_eq!(parsed.sub, subject);
        prop_assert_eq!(parsed.exp, claims.exp);
    }
}
