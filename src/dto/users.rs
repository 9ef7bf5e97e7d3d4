//! Rows of the admin users page.

use serde::Serialize;

use crate::domain::admin_user::AdminUserWithUser;
use crate::domain::user::UserSummary;
use crate::dto::DATETIME_FORMAT;

#[derive(Debug, Clone, Serialize)]
pub struct UserRowView {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub quote_requests: usize,
    pub completed_requests: usize,
    pub joined_at: String,
    pub last_activity: Option<String>,
}

impl From<&UserSummary> for UserRowView {
    fn from(summary: &UserSummary) -> Self {
        let user = &summary.user;
        Self {
            id: user.id.get(),
            email: user.email.to_string(),
            name: user.full_name.as_ref().map(ToString::to_string),
            quote_requests: summary.quote_requests_count,
            completed_requests: summary.completed_requests_count,
            joined_at: user.created_at.format(DATETIME_FORMAT).to_string(),
            last_activity: summary
                .last_activity
                .map(|at| at.format(DATETIME_FORMAT).to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminRowView {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub role: &'static str,
    pub is_active: bool,
    /// Super admins are never toggled from the console.
    pub can_toggle: bool,
    pub updated_at: String,
}

impl From<&AdminUserWithUser> for AdminRowView {
    fn from(row: &AdminUserWithUser) -> Self {
        Self {
            id: row.admin.id.get(),
            email: row.user.email.to_string(),
            name: row.user.full_name.as_ref().map(ToString::to_string),
            role: row.admin.role.as_str(),
            is_active: row.admin.is_active,
            can_toggle: row.admin.role != crate::domain::admin_user::AdminRole::SuperAdmin,
            updated_at: row.admin.updated_at.format(DATETIME_FORMAT).to_string(),
        }
    }
}
