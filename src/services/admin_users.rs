//! Managing who may use the admin console.

use crate::domain::admin_user::{AdminAccess, AdminRole, AdminUser, AdminUserWithUser, NewAdminUser};
use crate::domain::types::AdminUserId;
use crate::domain::user::{User, UserSummary};
use crate::forms::admin_users::{AddAdminForm, AddAdminPayload};
use crate::repository::{AdminUserReader, AdminUserWriter, UserReader};
use crate::services::auth::{require_admin, require_admin_manager};
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug)]
pub struct UsersPageData {
    pub users: Vec<UserSummary>,
    pub admins: Vec<AdminUserWithUser>,
    pub roles: Vec<AdminRole>,
    pub can_manage: bool,
}

pub fn load_users<R>(repo: &R, access: AdminAccess) -> ServiceResult<UsersPageData>
where
    R: UserReader + AdminUserReader + ?Sized,
{
    require_admin(access)?;

    let users = repo.list_user_summaries().map_err(|err| {
        log::error!("Failed to list users: {err}");
        err
    })?;
    let admins = repo.list_admin_users().map_err(|err| {
        log::error!("Failed to list admin users: {err}");
        err
    })?;

    Ok(UsersPageData {
        users,
        admins,
        roles: AdminRole::ALL.to_vec(),
        can_manage: access.can_manage_admins(),
    })
}

/// Grants `form.role` to the user with `form.email`. The user must have
/// signed in at least once.
pub fn grant_admin_role<R>(repo: &R, access: AdminAccess, form: AddAdminForm) -> ServiceResult<AdminUser>
where
    R: UserReader + AdminUserWriter + ?Sized,
{
    require_admin_manager(access)?;

    let payload = AddAdminPayload::try_from(form)?;
    if payload.role == AdminRole::SuperAdmin && access.role() != Some(AdminRole::SuperAdmin) {
        return Err(ServiceError::Unauthorized);
    }

    let user = repo
        .get_user_by_email(&payload.email)?
        .ok_or_else(|| {
            ServiceError::Form(format!(
                "No user with email {} has signed in yet.",
                payload.email
            ))
        })?;

    repo.grant_admin_role(&NewAdminUser::new(user.id, payload.role))
        .map_err(|err| {
            log::error!("Failed to grant {} to user {}: {err}", payload.role, user.id);
            ServiceError::from(err)
        })
}

/// Flips the active flag of an admin record. Super admins and the acting
/// user's own record cannot be toggled.
pub fn toggle_admin<R>(
    repo: &R,
    access: AdminAccess,
    acting: &User,
    id: i32,
) -> ServiceResult<AdminUser>
where
    R: AdminUserReader + AdminUserWriter + ?Sized,
{
    require_admin_manager(access)?;

    let id = AdminUserId::new(id).map_err(|_| ServiceError::NotFound)?;
    let admin = repo.get_admin_by_id(id)?.ok_or(ServiceError::NotFound)?;

    if admin.role == AdminRole::SuperAdmin {
        return Err(ServiceError::Form("Super admins cannot be deactivated.".into()));
    }
    if admin.user_id == acting.id {
        return Err(ServiceError::Form("You cannot change your own access.".into()));
    }

    repo.set_admin_active(admin.id, !admin.is_active)
        .map_err(|err| {
            log::error!("Failed to toggle admin {}: {err}", admin.id);
            ServiceError::from(err)
        })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::{DateTime, NaiveDateTime};

    use super::*;
    use crate::domain::types::{UserEmail, UserId};
    use crate::repository::mock::MockRepository;

    fn ts() -> NaiveDateTime {
        DateTime::from_timestamp(0, 0).unwrap().naive_utc()
    }

    fn user(id: i32) -> User {
        User {
            id: UserId::new(id).unwrap(),
            subject: format!("auth|{id}"),
            email: UserEmail::new(format!("user{id}@example.com")).unwrap(),
            full_name: None,
            created_at: ts(),
            last_sign_in_at: None,
        }
    }

    fn record(id: i32, user_id: i32, role: AdminRole, is_active: bool) -> AdminUser {
        AdminUser {
            id: AdminUserId::new(id).unwrap(),
            user_id: UserId::new(user_id).unwrap(),
            role,
            is_active,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn manager() -> AdminAccess {
        AdminAccess::Granted {
            role: AdminRole::Admin,
        }
    }

    #[test]
    fn moderators_cannot_grant_roles() {
        let repo = MockRepository::new();
        let access = AdminAccess::Granted {
            role: AdminRole::Moderator,
        };
        let form = AddAdminForm {
            email: "user2@example.com".into(),
            role: "moderator".into(),
        };

        assert!(matches!(
            grant_admin_role(&repo, access, form),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn grant_requires_a_known_user() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email().returning(|_| Ok(None));
        repo.expect_grant_admin_role().never();

        let form = AddAdminForm {
            email: "ghost@example.com".into(),
            role: "admin".into(),
        };

        assert!(matches!(
            grant_admin_role(&repo, manager(), form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn grant_stores_role_for_existing_user() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_email()
            .returning(|_| Ok(Some(user(2))));
        repo.expect_grant_admin_role()
            .withf(|new| new.user_id.get() == 2 && new.role == AdminRole::Moderator)
            .times(1)
            .returning(|new| Ok(record(5, new.user_id.get(), new.role, true)));

        let form = AddAdminForm {
            email: "user2@example.com".into(),
            role: "moderator".into(),
        };
        let admin = grant_admin_role(&repo, manager(), form).expect("granted");

        assert!(admin.is_active);
    }

    #[test]
    fn super_admin_cannot_be_toggled() {
        let mut repo = MockRepository::new();
        repo.expect_get_admin_by_id()
            .returning(|_| Ok(Some(record(1, 3, AdminRole::SuperAdmin, true))));
        repo.expect_set_admin_active().never();

        let result = toggle_admin(&repo, manager(), &user(1), 1);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn toggle_flips_active_flag() {
        let mut repo = MockRepository::new();
        repo.expect_get_admin_by_id()
            .returning(|_| Ok(Some(record(4, 3, AdminRole::Moderator, true))));
        repo.expect_set_admin_active()
            .withf(|_, is_active| !*is_active)
            .times(1)
            .returning(|id, is_active| Ok(record(id.get(), 3, AdminRole::Moderator, is_active)));

        let updated = toggle_admin(&repo, manager(), &user(1), 4).expect("toggled");

        assert!(!updated.is_active);
    }
}
