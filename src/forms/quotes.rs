//! Forms posted on quote threads.

use serde::Deserialize;
use validator::Validate;

use crate::domain::quote_request::QuoteAction;
use crate::domain::types::{EstimatedTime, MessageText, Price};
use crate::forms::{FormError, non_blank};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct MessageForm {
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct AdminMessageForm {
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub estimated_time: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub action: String,
}

pub struct AdminMessagePayload {
    pub message: MessageText,
    pub price: Option<Price>,
    pub estimated_time: Option<EstimatedTime>,
}

impl TryFrom<MessageForm> for MessageText {
    type Error = FormError;

    fn try_from(form: MessageForm) -> Result<Self, Self::Error> {
        form.validate()?;
        MessageText::new(form.message).map_err(|_| FormError::InvalidMessage)
    }
}

impl TryFrom<AdminMessageForm> for AdminMessagePayload {
    type Error = FormError;

    fn try_from(form: AdminMessageForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let price = non_blank(&form.price)
            .map(|raw| {
                raw.parse::<f64>()
                    .map_err(|_| FormError::InvalidPrice)
                    .and_then(|value| Price::new(value).map_err(|_| FormError::InvalidPrice))
            })
            .transpose()?;

        Ok(Self {
            message: MessageText::new(form.message).map_err(|_| FormError::InvalidMessage)?,
            price,
            estimated_time: non_blank(&form.estimated_time)
                .map(EstimatedTime::new)
                .transpose()
                .map_err(|_| FormError::InvalidMessage)?,
        })
    }
}

impl TryFrom<StatusForm> for QuoteAction {
    type Error = FormError;

    fn try_from(form: StatusForm) -> Result<Self, Self::Error> {
        form.action.trim().parse().map_err(|_| FormError::InvalidAction)
    }
}
