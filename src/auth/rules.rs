//! Authorization rules, kept as pure functions so every endpoint decision
//! is testable without a database. Callers translate `false` into a 403.

use crate::database::models::{Group, GroupMember, User};

/// Only admins may register new accounts.
pub fn can_register_user(actor: &User) -> bool {
    actor.is_admin
}

/// Only admins may edit accounts; there is no self-service path.
pub fn can_edit_user(actor: &User) -> bool {
    actor.is_admin
}

/// Only the owner may delete a group.
pub fn can_delete_group(actor: &User, group: &Group) -> bool {
    group.owner_id == actor.id
}

/// Only the owner may add or remove members.
pub fn can_manage_membership(actor: &User, group: &Group) -> bool {
    group.owner_id == actor.id
}

/// Posting requires a membership row belonging to the actor.
pub fn can_post_message(actor: &User, membership: Option<&GroupMember>) -> bool {
    membership.map_or(false, |m| m.user_id == actor.id)
}

/// Liking requires the same membership as posting.
pub fn can_like_message(actor: &User, membership: Option<&GroupMember>) -> bool {
    can_post_message(actor, membership)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, is_admin: bool) -> User {
        User {
            id,
            username: format!("user{}", id),
            password: "digest".to_string(),
            full_name: None,
            email: None,
            is_active: true,
            is_admin,
        }
    }

    fn group(owner_id: i64) -> Group {
        Group {
            id: 1,
            name: "general".to_string(),
            description: None,
            owner_id,
        }
    }

    fn membership(user_id: i64) -> GroupMember {
        GroupMember {
            id: 1,
            group_id: 1,
            user_id,
        }
    }

    #[test]
    fn only_admins_register_and_edit_users() {
        assert!(can_register_user(&user(1, true)));
        assert!(!can_register_user(&user(2, false)));
        assert!(can_edit_user(&user(1, true)));
        assert!(!can_edit_user(&user(2, false)));
    }

    #[test]
    fn only_owner_deletes_group() {
        let g = group(7);
        assert!(can_delete_group(&user(7, false), &g));
        assert!(!can_delete_group(&user(8, true), &g));
    }

    #[test]
    fn only_owner_manages_membership() {
        let g = group(7);
        assert!(can_manage_membership(&user(7, false), &g));
        assert!(!can_manage_membership(&user(8, false), &g));
    }

    #[test]
    fn posting_requires_own_membership() {
        let actor = user(3, false);
        assert!(can_post_message(&actor, Some(&membership(3))));
        assert!(!can_post_message(&actor, Some(&membership(4))));
        assert!(!can_post_message(&actor, None));
    }

    #[test]
    fn liking_follows_posting_rule() {
        let actor = user(3, false);
        assert!(can_like_message(&actor, Some(&membership(3))));
        assert!(!can_like_message(&actor, None));
    }
}
