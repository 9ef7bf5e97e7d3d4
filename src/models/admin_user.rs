//! Diesel models for admin role records.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::admin_user::{AdminUser as DomainAdminUser, NewAdminUser as DomainNewAdminUser};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::admin_users)]
/// Diesel model for [`crate::domain::admin_user::AdminUser`].
pub struct AdminUser {
    pub id: i32,
    pub user_id: i32,
    pub role: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::admin_users)]
/// Insertable form of [`AdminUser`].
pub struct NewAdminUser<'a> {
    pub user_id: i32,
    pub role: &'a str,
    pub is_active: bool,
}

impl TryFrom<AdminUser> for DomainAdminUser {
    type Error = TypeConstraintError;

    fn try_from(admin: AdminUser) -> Result<Self, Self::Error> {
        DomainAdminUser::try_new(
            admin.id,
            admin.user_id,
            &admin.role,
            admin.is_active,
            admin.created_at,
            admin.updated_at,
        )
    }
}

impl<'a> From<&'a DomainNewAdminUser> for NewAdminUser<'a> {
    fn from(admin: &'a DomainNewAdminUser) -> Self {
        Self {
            user_id: admin.user_id.get(),
            role: admin.role.as_str(),
            is_active: true,
        }
    }
}
