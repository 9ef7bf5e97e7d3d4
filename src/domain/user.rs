//! Site users mirrored from the external identity provider.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{PersonName, TypeConstraintError, UserEmail, UserId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    /// Subject claim issued by the identity provider.
    pub subject: String,
    pub email: UserEmail,
    pub full_name: Option<PersonName>,
    pub created_at: NaiveDateTime,
    pub last_sign_in_at: Option<NaiveDateTime>,
}

impl User {
    pub fn try_new(
        id: i32,
        subject: String,
        email: String,
        full_name: Option<String>,
        created_at: NaiveDateTime,
        last_sign_in_at: Option<NaiveDateTime>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: UserId::new(id)?,
            subject,
            email: UserEmail::new(email)?,
            full_name: full_name.and_then(|name| PersonName::new(name).ok()),
            created_at,
            last_sign_in_at,
        })
    }
}

/// User row for the admin users page.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct UserSummary {
    pub user: User,
    pub quote_requests_count: usize,
    pub completed_requests_count: usize,
    pub last_activity: Option<NaiveDateTime>,
}

/// Snapshot of the session claims used to create or refresh a [`User`].
#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub subject: String,
    pub email: UserEmail,
    pub full_name: Option<PersonName>,
}

impl NewUser {
    pub fn try_new(
        subject: impl Into<String>,
        email: impl Into<String>,
        full_name: Option<String>,
    ) -> Result<Self, TypeConstraintError> {
        let subject = subject.into().trim().to_string();
        if subject.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self {
            subject,
            email: UserEmail::new(email)?,
            full_name: full_name.and_then(|name| PersonName::new(name).ok()),
        })
    }
}
