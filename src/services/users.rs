//! Mirrors the signed-in identity into the local `users` table.

use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::domain::user::{NewUser, User};
use crate::repository::UserWriter;
use crate::services::{ServiceError, ServiceResult};

/// Creates or refreshes the local record for the session user.
pub fn sync_user<R>(repo: &R, claims: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let new_user = NewUser::try_new(claims.sub.as_str(), claims.email.as_str(), claims.name.clone())
        .map_err(|err| {
            log::warn!("Session claims rejected for `{}`: {err}", claims.sub);
            ServiceError::Unauthorized
        })?;

    repo.upsert_user(&new_user, Utc::now().naive_utc())
        .map_err(|err| {
            log::error!("Failed to sync user `{}`: {err}", claims.sub);
            ServiceError::from(err)
        })
}
