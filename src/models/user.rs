//! Diesel models for site users.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{PersonName, TypeConstraintError, UserEmail, UserId};
use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
/// Diesel model for [`crate::domain::user::User`].
pub struct User {
    pub id: i32,
    pub subject: String,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: NaiveDateTime,
    pub last_sign_in_at: Option<NaiveDateTime>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
/// Insertable form of [`User`], also used to refresh it on sign in.
pub struct NewUser<'a> {
    pub subject: &'a str,
    pub email: &'a str,
    pub full_name: Option<&'a str>,
    pub last_sign_in_at: Option<NaiveDateTime>,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::try_from(user.id)?,
            subject: user.subject,
            email: UserEmail::new(user.email)?,
            full_name: user.full_name.and_then(|name| PersonName::new(name).ok()),
            created_at: user.created_at,
            last_sign_in_at: user.last_sign_in_at,
        })
    }
}

impl<'a> NewUser<'a> {
    pub fn from_domain(user: &'a DomainNewUser, signed_in_at: NaiveDateTime) -> Self {
        Self {
            subject: user.subject.as_str(),
            email: user.email.as_str(),
            full_name: user.full_name.as_ref().map(|name| name.as_str()),
            last_sign_in_at: Some(signed_in_at),
        }
    }
}
