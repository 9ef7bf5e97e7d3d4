//! Append-only message thread attached to a quote request.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    EstimatedTime, MessageText, Price, QuoteMessageId, QuoteRequestId, TypeConstraintError, UserId,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QuoteMessage {
    pub id: QuoteMessageId,
    pub quote_request_id: QuoteRequestId,
    pub sender_id: UserId,
    pub message: MessageText,
    pub is_admin: bool,
    pub price: Option<Price>,
    pub estimated_time: Option<EstimatedTime>,
    pub created_at: NaiveDateTime,
}

impl QuoteMessage {
    /// Validates raw storage values.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: i32,
        quote_request_id: i32,
        sender_id: i32,
        message: String,
        is_admin: bool,
        price: Option<f64>,
        estimated_time: Option<String>,
        created_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: QuoteMessageId::new(id)?,
            quote_request_id: QuoteRequestId::new(quote_request_id)?,
            sender_id: UserId::new(sender_id)?,
            message: MessageText::new(message)?,
            is_admin,
            price: price.map(Price::new).transpose()?,
            estimated_time: estimated_time
                .filter(|value| !value.trim().is_empty())
                .map(EstimatedTime::new)
                .transpose()?,
            created_at,
        })
    }

    /// Whether this message proposes a price for the job.
    pub fn is_offer(&self) -> bool {
        self.price.is_some()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewQuoteMessage {
    pub quote_request_id: QuoteRequestId,
    pub sender_id: UserId,
    pub message: MessageText,
    pub is_admin: bool,
    pub price: Option<Price>,
    pub estimated_time: Option<EstimatedTime>,
}

impl NewQuoteMessage {
    /// Message posted by the customer who owns the request.
    #[must_use]
    pub fn from_customer(
        quote_request_id: QuoteRequestId,
        sender_id: UserId,
        message: MessageText,
    ) -> Self {
        Self {
            quote_request_id,
            sender_id,
            message,
            is_admin: false,
            price: None,
            estimated_time: None,
        }
    }

    /// Message posted from the admin console, optionally carrying an offer.
    #[must_use]
    pub fn from_admin(
        quote_request_id: QuoteRequestId,
        sender_id: UserId,
        message: MessageText,
        price: Option<Price>,
        estimated_time: Option<EstimatedTime>,
    ) -> Self {
        Self {
            quote_request_id,
            sender_id,
            message,
            is_admin: true,
            price,
            estimated_time,
        }
    }
}
