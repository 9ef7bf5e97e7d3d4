use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{UserEmail, UserId};
use crate::domain::user::{NewUser, User, UserSummary};
use crate::models::user::{NewUser as DbNewUser, User as DbUser};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .find(id.get())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(User::try_from).transpose()?)
    }

    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email.as_str()))
            .order(users::last_sign_in_at.desc())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(User::try_from).transpose()?)
    }

    fn list_user_summaries(&self) -> RepositoryResult<Vec<UserSummary>> {
        use crate::schema::{quote_requests, users};

        let mut conn = self.conn()?;

        let db_users = users::table
            .order(users::created_at.desc())
            .load::<DbUser>(&mut conn)?;

        let requests = quote_requests::table
            .select((
                quote_requests::user_id,
                quote_requests::status,
                quote_requests::updated_at,
            ))
            .load::<(i32, String, NaiveDateTime)>(&mut conn)?;

        let mut counters: HashMap<i32, (usize, usize, Option<NaiveDateTime>)> = HashMap::new();
        for (user_id, status, updated_at) in requests {
            let entry = counters.entry(user_id).or_default();
            entry.0 += 1;
            if status == "completed" {
                entry.1 += 1;
            }
            entry.2 = entry.2.max(Some(updated_at));
        }

        db_users
            .into_iter()
            .map(|db_user| -> RepositoryResult<UserSummary> {
                let (total, completed, last_request) =
                    counters.get(&db_user.id).copied().unwrap_or_default();
                let user = User::try_from(db_user)?;
                let last_activity = last_request.max(user.last_sign_in_at);
                Ok(UserSummary {
                    user,
                    quote_requests_count: total,
                    completed_requests_count: completed,
                    last_activity,
                })
            })
            .collect()
    }
}

impl UserWriter for DieselRepository {
    fn upsert_user(&self, user: &NewUser, signed_in_at: NaiveDateTime) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let new_user = DbNewUser::from_domain(user, signed_in_at);

        let stored = diesel::insert_into(users::table)
            .values(&new_user)
            .on_conflict(users::subject)
            .do_update()
            .set(&new_user)
            .get_result::<DbUser>(&mut conn)?;

        Ok(User::try_from(stored)?)
    }
}
