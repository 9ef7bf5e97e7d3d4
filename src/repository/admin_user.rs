use chrono::Utc;
use diesel::prelude::*;

use crate::domain::admin_user::{AdminUser, AdminUserWithUser, NewAdminUser};
use crate::domain::types::{AdminUserId, UserId};
use crate::domain::user::User;
use crate::models::admin_user::{AdminUser as DbAdminUser, NewAdminUser as DbNewAdminUser};
use crate::models::user::User as DbUser;
use crate::repository::errors::RepositoryResult;
use crate::repository::{AdminUserReader, AdminUserWriter, DieselRepository};

impl AdminUserReader for DieselRepository {
    fn get_admin_by_user_id(&self, user_id: UserId) -> RepositoryResult<Option<AdminUser>> {
        use crate::schema::admin_users;

        let mut conn = self.conn()?;
        let admin = admin_users::table
            .filter(admin_users::user_id.eq(user_id.get()))
            .first::<DbAdminUser>(&mut conn)
            .optional()?;

        Ok(admin.map(AdminUser::try_from).transpose()?)
    }

    fn get_admin_by_id(&self, id: AdminUserId) -> RepositoryResult<Option<AdminUser>> {
        use crate::schema::admin_users;

        let mut conn = self.conn()?;
        let admin = admin_users::table
            .find(id.get())
            .first::<DbAdminUser>(&mut conn)
            .optional()?;

        Ok(admin.map(AdminUser::try_from).transpose()?)
    }

    fn list_admin_users(&self) -> RepositoryResult<Vec<AdminUserWithUser>> {
        use crate::schema::{admin_users, users};

        let mut conn = self.conn()?;
        let rows = admin_users::table
            .inner_join(users::table)
            .order(admin_users::created_at.desc())
            .select((DbAdminUser::as_select(), DbUser::as_select()))
            .load::<(DbAdminUser, DbUser)>(&mut conn)?;

        rows.into_iter()
            .map(|(admin, user)| -> RepositoryResult<AdminUserWithUser> {
                Ok(AdminUserWithUser {
                    admin: AdminUser::try_from(admin)?,
                    user: User::try_from(user)?,
                })
            })
            .collect()
    }
}

impl AdminUserWriter for DieselRepository {
    fn grant_admin_role(&self, admin: &NewAdminUser) -> RepositoryResult<AdminUser> {
        use crate::schema::admin_users;

        let mut conn = self.conn()?;
        let new_admin = DbNewAdminUser::from(admin);
        let now = Utc::now().naive_utc();

        let stored = diesel::insert_into(admin_users::table)
            .values(&new_admin)
            .on_conflict(admin_users::user_id)
            .do_update()
            .set((
                admin_users::role.eq(new_admin.role),
                admin_users::is_active.eq(true),
                admin_users::updated_at.eq(now),
            ))
            .get_result::<DbAdminUser>(&mut conn)?;

        Ok(AdminUser::try_from(stored)?)
    }

    fn set_admin_active(&self, id: AdminUserId, is_active: bool) -> RepositoryResult<AdminUser> {
        use crate::schema::admin_users;

        let mut conn = self.conn()?;
        let updated = diesel::update(admin_users::table.find(id.get()))
            .set((
                admin_users::is_active.eq(is_active),
                admin_users::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbAdminUser>(&mut conn)?;

        Ok(AdminUser::try_from(updated)?)
    }
}
