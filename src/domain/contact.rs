//! Messages left through the public contact form.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ContactMessageId, MessageText, PersonName, PhoneNumber, UserEmail};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: PersonName,
    pub email: UserEmail,
    pub phone: Option<PhoneNumber>,
    pub service: Option<String>,
    pub message: MessageText,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewContactMessage {
    pub name: PersonName,
    pub email: UserEmail,
    pub phone: Option<PhoneNumber>,
    pub service: Option<String>,
    pub message: MessageText,
}
