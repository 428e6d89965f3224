/// Authorization rules for the community service
///
/// Every check is a pure function of the actor's capabilities and the
/// resource's ownership/group, returning an allow/deny decision with a
/// reason code. Handlers and services compose these; there is no
/// permission-class hierarchy.
///
/// Rule order, first match wins:
/// 1. no actor -> deny
/// 2. actor not staff and actor group differs from the resource group -> deny
/// 3. mutation by someone other than the owner -> deny (staff included)
/// 4. allow
use uuid::Uuid;

use crate::error::AppError;
use crate::models::User;

/// Outcome of a permission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny(DenyReason),
}

/// Why a check denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    GroupMismatch,
    NotOwner,
}

impl DenyReason {
    pub fn message(self) -> &'static str {
        match self {
            DenyReason::Unauthenticated => "authentication required",
            DenyReason::GroupMismatch => "you do not belong to this group",
            DenyReason::NotOwner => "only the owner may do this",
        }
    }
}

impl Access {
    /// Denials surface as 403; the request ends here.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Access::Allow => Ok(()),
            Access::Deny(reason) => Err(AppError::Forbidden(reason.message().to_string())),
        }
    }
}

/// Access to a resource scoped to `resource_group`.
///
/// Group comparison is strict Option equality: a group-less resource is not
/// visible to a grouped non-staff actor, and vice versa. Staff bypass the
/// comparison entirely.
pub fn check_group_access(actor: Option<&User>, resource_group: Option<Uuid>) -> Access {
    let Some(actor) = actor else {
        return Access::Deny(DenyReason::Unauthenticated);
    };
    if !actor.is_staff && actor.group_id != resource_group {
        return Access::Deny(DenyReason::GroupMismatch);
    }
    Access::Allow
}

/// Access to a listing/search scoped to an explicitly requested group id
pub fn check_group_request(actor: Option<&User>, group_id: Uuid) -> Access {
    check_group_access(actor, Some(group_id))
}

/// Mutation (edit/delete) of a resource owned by `owner_id` inside
/// `resource_group`. Ownership is checked after group scope and is not
/// waived for staff.
pub fn check_mutate(actor: Option<&User>, owner_id: Uuid, resource_group: Option<Uuid>) -> Access {
    let Some(actor) = actor else {
        return Access::Deny(DenyReason::Unauthenticated);
    };
    if !actor.is_staff && actor.group_id != resource_group {
        return Access::Deny(DenyReason::GroupMismatch);
    }
    if actor.id != owner_id {
        return Access::Deny(DenyReason::NotOwner);
    }
    Access::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(group_id: Option<Uuid>, is_staff: bool) -> User {
        User {
            id: Uuid::new_v4(),
            username: "u".to_string(),
            name: String::new(),
            email: String::new(),
            avatar: None,
            group_id,
            is_coach: false,
            is_staff,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn unauthenticated_is_denied_before_anything_else() {
        let group = Uuid::new_v4();
        assert_eq!(
            check_group_access(None, Some(group)),
            Access::Deny(DenyReason::Unauthenticated)
        );
        assert_eq!(
            check_mutate(None, Uuid::new_v4(), Some(group)),
            Access::Deny(DenyReason::Unauthenticated)
        );
    }

    #[test]
    fn group_mismatch_is_denied_for_non_staff() {
        let actor = user(Some(Uuid::new_v4()), false);
        assert_eq!(
            check_group_access(Some(&actor), Some(Uuid::new_v4())),
            Access::Deny(DenyReason::GroupMismatch)
        );
    }

    #[test]
    fn staff_bypass_group_scoping() {
        let actor = user(Some(Uuid::new_v4()), true);
        assert_eq!(
            check_group_access(Some(&actor), Some(Uuid::new_v4())),
            Access::Allow
        );
        assert_eq!(check_group_access(Some(&actor), None), Access::Allow);
    }

    #[test]
    fn matching_group_is_allowed() {
        let group = Uuid::new_v4();
        let actor = user(Some(group), false);
        assert_eq!(check_group_access(Some(&actor), Some(group)), Access::Allow);
    }

    #[test]
    fn group_comparison_is_strict_about_missing_groups() {
        let grouped = user(Some(Uuid::new_v4()), false);
        assert_eq!(
            check_group_access(Some(&grouped), None),
            Access::Deny(DenyReason::GroupMismatch)
        );

        let groupless = user(None, false);
        assert_eq!(
            check_group_access(Some(&groupless), Some(Uuid::new_v4())),
            Access::Deny(DenyReason::GroupMismatch)
        );
        assert_eq!(check_group_access(Some(&groupless), None), Access::Allow);
    }

    #[test]
    fn only_the_owner_may_mutate() {
        let group = Uuid::new_v4();
        let actor = user(Some(group), false);
        assert_eq!(
            check_mutate(Some(&actor), actor.id, Some(group)),
            Access::Allow
        );
        assert_eq!(
            check_mutate(Some(&actor), Uuid::new_v4(), Some(group)),
            Access::Deny(DenyReason::NotOwner)
        );
    }

    #[test]
    fn staff_do_not_bypass_ownership() {
        let group = Uuid::new_v4();
        let staff = user(Some(group), true);
        assert_eq!(
            check_mutate(Some(&staff), Uuid::new_v4(), Some(group)),
            Access::Deny(DenyReason::NotOwner)
        );
    }

    #[test]
    fn group_mismatch_wins_over_ownership() {
        let actor = user(Some(Uuid::new_v4()), false);
        assert_eq!(
            check_mutate(Some(&actor), actor.id, Some(Uuid::new_v4())),
            Access::Deny(DenyReason::GroupMismatch)
        );
    }
}
