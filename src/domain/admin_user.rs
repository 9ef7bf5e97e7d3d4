//! Administrative role records consulted by the authorization gate.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AdminUserId, TypeConstraintError, UserId};
use crate::domain::user::User;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    #[default]
    Admin,
    Moderator,
}

impl AdminRole {
    pub const ALL: [AdminRole; 3] = [AdminRole::SuperAdmin, AdminRole::Admin, AdminRole::Moderator];

    pub fn as_str(self) -> &'static str {
        match self {
            AdminRole::SuperAdmin => "super_admin",
            AdminRole::Admin => "admin",
            AdminRole::Moderator => "moderator",
        }
    }

    /// Whether the role may grant roles and toggle other admins.
    pub fn can_manage_admins(self) -> bool {
        matches!(self, AdminRole::SuperAdmin | AdminRole::Admin)
    }
}

impl Display for AdminRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdminRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown role `{s}`")))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub user_id: UserId,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl AdminUser {
    pub fn try_new(
        id: i32,
        user_id: i32,
        role: &str,
        is_active: bool,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: AdminUserId::new(id)?,
            user_id: UserId::new(user_id)?,
            role: role.parse()?,
            is_active,
            created_at,
            updated_at,
        })
    }
}

/// Admin record joined with the user it belongs to.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AdminUserWithUser {
    pub admin: AdminUser,
    pub user: User,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewAdminUser {
    pub user_id: UserId,
    pub role: AdminRole,
}

impl NewAdminUser {
    #[must_use]
    pub fn new(user_id: UserId, role: AdminRole) -> Self {
        Self { user_id, role }
    }
}

/// Outcome of the admin check for one user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "access", rename_all = "snake_case")]
pub enum AdminAccess {
    #[default]
    Denied,
    Granted {
        role: AdminRole,
    },
}

impl AdminAccess {
    pub fn is_granted(self) -> bool {
        matches!(self, AdminAccess::Granted { .. })
    }

    pub fn role(self) -> Option<AdminRole> {
        match self {
            AdminAccess::Granted { role } => Some(role),
            AdminAccess::Denied => None,
        }
    }

    pub fn can_manage_admins(self) -> bool {
        self.role().is_some_and(AdminRole::can_manage_admins)
    }
}

impl From<Option<&AdminUser>> for AdminAccess {
    /// Missing or inactive records grant nothing.
    fn from(admin: Option<&AdminUser>) -> Self {
        match admin {
            Some(admin) if admin.is_active => AdminAccess::Granted { role: admin.role },
            _ => AdminAccess::Denied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn admin(role: AdminRole, is_active: bool) -> AdminUser {
        let now = DateTime::from_timestamp(0, 0).expect("epoch").naive_utc();
        AdminUser {
            id: AdminUserId::new(1).expect("id"),
            user_id: UserId::new(1).expect("id"),
            role,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn inactive_or_missing_records_are_denied() {
        assert_eq!(AdminAccess::from(None), AdminAccess::Denied);
        let inactive = admin(AdminRole::SuperAdmin, false);
        assert_eq!(AdminAccess::from(Some(&inactive)), AdminAccess::Denied);
    }

    #[test]
    fn only_admins_manage_admins() {
        let moderator = admin(AdminRole::Moderator, true);
        let access = AdminAccess::from(Some(&moderator));
        assert!(access.is_granted());
        assert!(!access.can_manage_admins());

        let owner = admin(AdminRole::Admin, true);
        assert!(AdminAccess::from(Some(&owner)).can_manage_admins());
    }

    #[test]
    fn roles_parse_from_storage_values() {
        assert_eq!("super_admin".parse::<AdminRole>(), Ok(AdminRole::SuperAdmin));
        assert!("root".parse::<AdminRole>().is_err());
    }
}
