/**
 * Post Ownership
 *
 * Decides whether a caller may mutate a post. The only rule is ownership:
 * the caller's user id must equal the post's `user_id`.
 */

use crate::backend::posts::model::Post;

/// Authorization checks for mutating post operations
pub trait PostAbility: Send + Sync {
    fn can_update(&self, user_id: i64, post: &Post) -> bool;
    fn can_delete(&self, user_id: i64, post: &Post) -> bool;
}

/// Only the owner may update or delete a post
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerAbility;

impl PostAbility for OwnerAbility {
    fn can_update(&self, user_id: i64, post: &Post) -> bool {
        user_id == post.user_id
    }

    fn can_delete(&self, user_id: i64, post: &Post) -> bool {
        user_id == post.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post_owned_by(user_id: i64) -> Post {
        let now = Utc::now();
        Post {
            id: 1,
            user_id,
            title: "t".to_string(),
            body: "b".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_owner_may_mutate() {
        let post = post_owned_by(42);
        assert!(OwnerAbility.can_update(42, &post));
        assert!(OwnerAbility.can_delete(42, &post));
    }

    #[test]
    fn test_others_may_not() {
        let post = post_owned_by(42);
        assert!(!OwnerAbility.can_update(41, &post));
        assert!(!OwnerAbility.can_delete(43, &post));
    }
}
