//! Quote requests and threads shaped for templates.

use serde::Serialize;

use crate::domain::quote_message::QuoteMessage;
use crate::domain::quote_request::{QuoteAction, QuoteRequest, QuoteRequestWithUser, QuoteStatus};
use crate::domain::user::User;
use crate::dto::{DATE_FORMAT, DATETIME_FORMAT};
use crate::render::money;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActionView {
    pub value: &'static str,
    pub label: &'static str,
    /// Bootstrap button variant.
    pub style: &'static str,
}

impl From<QuoteAction> for ActionView {
    fn from(action: QuoteAction) -> Self {
        let (label, style) = match action {
            QuoteAction::SendQuote => ("Mark as quoted", "primary"),
            QuoteAction::Accept => ("Accept quote", "success"),
            QuoteAction::Complete => ("Mark completed", "success"),
            QuoteAction::Cancel => ("Cancel request", "outline-danger"),
        };
        Self {
            value: action.as_str(),
            label,
            style,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusView {
    pub value: &'static str,
    pub badge: &'static str,
}

impl From<QuoteStatus> for StatusView {
    fn from(status: QuoteStatus) -> Self {
        let badge = match status {
            QuoteStatus::Pending => "warning",
            QuoteStatus::Quoted => "info",
            QuoteStatus::Accepted => "primary",
            QuoteStatus::Completed => "success",
            QuoteStatus::Cancelled => "secondary",
        };
        Self {
            value: status.as_str(),
            badge,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteRequestView {
    pub id: i32,
    pub service: &'static str,
    pub service_slug: &'static str,
    pub pickup_location: String,
    pub delivery_location: String,
    pub preferred_date: Option<String>,
    pub description: Option<String>,
    pub status: StatusView,
    pub created_at: String,
    pub updated_at: String,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
}

impl From<&QuoteRequest> for QuoteRequestView {
    fn from(request: &QuoteRequest) -> Self {
        Self {
            id: request.id.get(),
            service: request.service_type.label(),
            service_slug: request.service_type.slug(),
            pickup_location: request.pickup_location.to_string(),
            delivery_location: request.delivery_location.to_string(),
            preferred_date: request
                .preferred_date
                .map(|date| date.format(DATE_FORMAT).to_string()),
            description: request.description.clone(),
            status: request.status.into(),
            created_at: request.created_at.format(DATETIME_FORMAT).to_string(),
            updated_at: request.updated_at.format(DATETIME_FORMAT).to_string(),
            user_email: None,
            user_name: None,
        }
    }
}

impl From<&QuoteRequestWithUser> for QuoteRequestView {
    fn from(row: &QuoteRequestWithUser) -> Self {
        Self {
            user_email: Some(row.user_email.clone()),
            user_name: row.user_name.clone(),
            ..QuoteRequestView::from(&row.request)
        }
    }
}

impl QuoteRequestView {
    pub fn with_requester(mut self, user: Option<&User>) -> Self {
        if let Some(user) = user {
            self.user_email = Some(user.email.to_string());
            self.user_name = user.full_name.as_ref().map(ToString::to_string);
        }
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub message: String,
    pub is_admin: bool,
    pub price: Option<String>,
    pub estimated_time: Option<String>,
    pub created_at: String,
}

impl From<&QuoteMessage> for MessageView {
    fn from(message: &QuoteMessage) -> Self {
        Self {
            message: message.message.to_string(),
            is_admin: message.is_admin,
            price: message.price.map(|price| money(price.get())),
            estimated_time: message.estimated_time.as_ref().map(ToString::to_string),
            created_at: message.created_at.format(DATETIME_FORMAT).to_string(),
        }
    }
}
