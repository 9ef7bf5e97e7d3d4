//! Admin authorization gate.

use crate::domain::admin_user::{AdminAccess, AdminRole};
use crate::domain::types::UserId;
use crate::repository::AdminUserReader;
use crate::repository::errors::RepositoryResult;
use crate::services::{ServiceError, ServiceResult};

/// Reads the admin decision for `user_id`, surfacing lookup errors.
pub fn lookup_admin_access<R>(repo: &R, user_id: UserId) -> RepositoryResult<AdminAccess>
where
    R: AdminUserReader + ?Sized,
{
    let admin = repo.get_admin_by_user_id(user_id)?;
    let access = AdminAccess::from(admin.as_ref());
    if !access.is_granted() {
        log::info!("User {user_id} has no active admin role");
    }
    Ok(access)
}

/// Looks up the admin record of `user_id`. Lookup errors deny access.
pub fn resolve_admin_access<R>(repo: &R, user_id: UserId) -> AdminAccess
where
    R: AdminUserReader + ?Sized,
{
    match lookup_admin_access(repo, user_id) {
        Ok(access) => access,
        Err(err) => {
            log::warn!("Admin lookup failed for user {user_id}, denying access: {err}");
            AdminAccess::Denied
        }
    }
}

/// Any active admin role.
pub fn require_admin(access: AdminAccess) -> ServiceResult<AdminRole> {
    access.role().ok_or(ServiceError::Unauthorized)
}

/// `super_admin` or `admin`.
pub fn require_admin_manager(access: AdminAccess) -> ServiceResult<AdminRole> {
    match access.role() {
        Some(role) if role.can_manage_admins() => Ok(role),
        _ => Err(ServiceError::Unauthorized),
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::admin_user::AdminUser;
    use crate::domain::types::AdminUserId;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use chrono::DateTime;

    fn admin(role: AdminRole, is_active: bool) -> AdminUser {
        let now = DateTime::from_timestamp(0, 0).expect("epoch").naive_utc();
        AdminUser {
            id: AdminUserId::new(1).expect("id"),
            user_id: UserId::new(5).expect("id"),
            role,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn active_record_grants_its_role() {
        let mut repo = MockRepository::new();
        repo.expect_get_admin_by_user_id()
            .returning(|_| Ok(Some(admin(AdminRole::Moderator, true))));

        let access = resolve_admin_access(&repo, UserId::new(5).expect("id"));
        assert_eq!(access, AdminAccess::Granted { role: AdminRole::Moderator });
        assert!(require_admin(access).is_ok());
        assert!(matches!(
            require_admin_manager(access),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn lookup_failure_fails_closed() {
        let mut repo = MockRepository::new();
        repo.expect_get_admin_by_user_id()
            .returning(|_| Err(RepositoryError::ConnectionError("down".into())));

        let access = resolve_admin_access(&repo, UserId::new(5).expect("id"));
        assert_eq!(access, AdminAccess::Denied);
        assert!(matches!(require_admin(access), Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn inactive_and_missing_records_are_denied() {
        let mut repo = MockRepository::new();
        repo.expect_get_admin_by_user_id()
            .returning(|_| Ok(Some(admin(AdminRole::SuperAdmin, false))));
        assert_eq!(
            resolve_admin_access(&repo, UserId::new(5).expect("id")),
            AdminAccess::Denied
        );

        let mut repo = MockRepository::new();
        repo.expect_get_admin_by_user_id().returning(|_| Ok(None));
        assert_eq!(
            resolve_admin_access(&repo, UserId::new(5).expect("id")),
            AdminAccess::Denied
        );
    }
}
