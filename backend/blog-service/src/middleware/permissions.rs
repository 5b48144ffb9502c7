/// Authorization predicates for blog-service
///
/// Stateless checks over the session-carried role and a resource's owner id.
/// Role hierarchy: subscriber < author < admin.
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::Role;
use uuid::Uuid;

/// Admin-only operations (category/tag management)
pub fn require_admin(user: &CurrentUser, action: &str) -> Result<()> {
    if user.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Access denied: Administrator privileges required for {action}"
        )))
    }
}

/// Operations open to authors and admins (post creation)
pub fn require_author(user: &CurrentUser) -> Result<()> {
    if user.role >= Role::Author {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Access denied. Authors or admins only".to_string(),
        ))
    }
}

/// Operations on an owned resource: the owner or an admin may proceed.
/// `owner_id` is `None` for resources whose owner account was deleted; only
/// admins may manage those.
pub fn require_owner_or_admin(
    user: &CurrentUser,
    owner_id: Option<Uuid>,
    denial_message: &str,
) -> Result<()> {
    if user.role == Role::Admin || owner_id == Some(user.id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(denial_message.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::from_u128(7),
            role,
        }
    }

    #[test]
    fn admin_passes_every_check() {
        let admin = user(Role::Admin);
        assert!(require_admin(&admin, "category management").is_ok());
        assert!(require_author(&admin).is_ok());
        assert!(require_owner_or_admin(&admin, Some(Uuid::from_u128(99)), "denied").is_ok());
        assert!(require_owner_or_admin(&admin, None, "denied").is_ok());
    }

    #[test]
    fn author_can_author_but_not_administer() {
        let author = user(Role::Author);
        assert!(require_author(&author).is_ok());
        assert!(require_admin(&author, "tag management").is_err());
    }

    #[test]
    fn subscriber_cannot_author() {
        let subscriber = user(Role::Subscriber);
        assert!(require_author(&subscriber).is_err());
        assert!(require_admin(&subscriber, "tag management").is_err());
    }

    #[test]
    fn owner_may_manage_own_resource() {
        let owner = user(Role::Subscriber);
        assert!(require_owner_or_admin(&owner, Some(owner.id), "denied").is_ok());
    }

    #[test]
    fn non_owner_is_denied() {
        let outsider = user(Role::Author);
        let result = require_owner_or_admin(&outsider, Some(Uuid::from_u128(99)), "denied");
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn orphaned_resource_is_admin_only() {
        let outsider = user(Role::Author);
        assert!(require_owner_or_admin(&outsider, None, "denied").is_err());
    }
}
