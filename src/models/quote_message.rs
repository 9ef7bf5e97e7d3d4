//! Diesel models for quote thread messages.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::quote_message::{
    NewQuoteMessage as DomainNewQuoteMessage, QuoteMessage as DomainQuoteMessage,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::quote_messages)]
/// Diesel model for [`crate::domain::quote_message::QuoteMessage`].
pub struct QuoteMessage {
    pub id: i32,
    pub quote_request_id: i32,
    pub sender_id: i32,
    pub message: String,
    pub is_admin: bool,
    pub price: Option<f64>,
    pub estimated_time: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::quote_messages)]
/// Insertable form of [`QuoteMessage`].
pub struct NewQuoteMessage<'a> {
    pub quote_request_id: i32,
    pub sender_id: i32,
    pub message: &'a str,
    pub is_admin: bool,
    pub price: Option<f64>,
    pub estimated_time: Option<&'a str>,
}

impl TryFrom<QuoteMessage> for DomainQuoteMessage {
    type Error = TypeConstraintError;

    fn try_from(message: QuoteMessage) -> Result<Self, Self::Error> {
        DomainQuoteMessage::try_new(
            message.id,
            message.quote_request_id,
            message.sender_id,
            message.message,
            message.is_admin,
            message.price,
            message.estimated_time,
            message.created_at,
        )
    }
}

impl<'a> From<&'a DomainNewQuoteMessage> for NewQuoteMessage<'a> {
    fn from(message: &'a DomainNewQuoteMessage) -> Self {
        Self {
            quote_request_id: message.quote_request_id.get(),
            sender_id: message.sender_id.get(),
            message: message.message.as_str(),
            is_admin: message.is_admin,
            price: message.price.map(|price| price.get()),
            estimated_time: message.estimated_time.as_ref().map(|time| time.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EstimatedTime, MessageText, Price, QuoteRequestId, UserId};

    #[test]
    fn admin_offer_keeps_price_and_estimate() {
        let domain = DomainNewQuoteMessage::from_admin(
            QuoteRequestId::new(1).expect("id"),
            UserId::new(9).expect("id"),
            MessageText::new("Our offer").expect("text"),
            Some(Price::new(1250.5).expect("price")),
            Some(EstimatedTime::new("2 days").expect("estimate")),
        );
        let new: NewQuoteMessage = (&domain).into();
        assert!(new.is_admin);
        assert_eq!(new.price, Some(1250.5));
        assert_eq!(new.estimated_time, Some("2 days"));
    }
}
