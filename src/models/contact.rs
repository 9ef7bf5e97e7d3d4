//! Diesel models for contact form submissions.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::contact::{
    ContactMessage as DomainContactMessage, NewContactMessage as DomainNewContactMessage,
};
use crate::domain::types::{
    ContactMessageId, MessageText, PersonName, PhoneNumber, TypeConstraintError, UserEmail,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::contact_messages)]
pub struct ContactMessage {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub message: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contact_messages)]
pub struct NewContactMessage<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub service: Option<&'a str>,
    pub message: &'a str,
}

impl TryFrom<ContactMessage> for DomainContactMessage {
    type Error = TypeConstraintError;

    fn try_from(contact: ContactMessage) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ContactMessageId::try_from(contact.id)?,
            name: PersonName::new(contact.name)?,
            email: UserEmail::new(contact.email)?,
            phone: contact.phone.map(PhoneNumber::new).transpose()?,
            service: contact.service,
            message: MessageText::new(contact.message)?,
            created_at: contact.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewContactMessage> for NewContactMessage<'a> {
    fn from(contact: &'a DomainNewContactMessage) -> Self {
        Self {
            name: contact.name.as_str(),
            email: contact.email.as_str(),
            phone: contact.phone.as_ref().map(|phone| phone.as_str()),
            service: contact.service.as_deref(),
            message: contact.message.as_str(),
        }
    }
}
