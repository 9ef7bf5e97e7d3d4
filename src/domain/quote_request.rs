//! Customer quote requests and their status state machine.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::{Location, QuoteRequestId, TypeConstraintError, UserId};

/// Lifecycle of a quote request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Pending,
    Quoted,
    Accepted,
    Completed,
    Cancelled,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 5] = [
        QuoteStatus::Pending,
        QuoteStatus::Quoted,
        QuoteStatus::Accepted,
        QuoteStatus::Completed,
        QuoteStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Quoted => "quoted",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Completed => "completed",
            QuoteStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, QuoteStatus::Completed | QuoteStatus::Cancelled)
    }

    /// Applies `action`, returning the next status or the rejected transition.
    pub fn apply(self, action: QuoteAction) -> Result<QuoteStatus, InvalidTransition> {
        use QuoteAction::*;
        use QuoteStatus::*;

        match (self, action) {
            (Pending | Quoted, SendQuote) => Ok(Quoted),
            (Quoted, Accept) => Ok(Accepted),
            (Accepted, Complete) => Ok(Completed),
            (Pending | Quoted | Accepted, Cancel) => Ok(Cancelled),
            (from, action) => Err(InvalidTransition { from, action }),
        }
    }

    /// Actions that are legal from this status.
    pub fn available_actions(self) -> Vec<QuoteAction> {
        QuoteAction::ALL
            .into_iter()
            .filter(|action| self.apply(*action).is_ok())
            .collect()
    }
}

impl Display for QuoteStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuoteStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown status `{s}`")))
    }
}

/// Event that moves a request between statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteAction {
    SendQuote,
    Accept,
    Complete,
    Cancel,
}

impl QuoteAction {
    pub const ALL: [QuoteAction; 4] = [
        QuoteAction::SendQuote,
        QuoteAction::Accept,
        QuoteAction::Complete,
        QuoteAction::Cancel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuoteAction::SendQuote => "send_quote",
            QuoteAction::Accept => "accept",
            QuoteAction::Complete => "complete",
            QuoteAction::Cancel => "cancel",
        }
    }
}

impl Display for QuoteAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteAction {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuoteAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown action `{s}`")))
    }
}

/// A transition missing from the table.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("cannot {action} a request that is {from}")]
pub struct InvalidTransition {
    pub from: QuoteStatus,
    pub action: QuoteAction,
}

/// Services offered on the request form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    PackingMoving,
    Shipping,
    FreightForwarding,
    CustomClearance,
    Relocation,
    OfficeShifting,
    FineArtHandling,
}

impl ServiceType {
    pub const ALL: [ServiceType; 7] = [
        ServiceType::PackingMoving,
        ServiceType::Shipping,
        ServiceType::FreightForwarding,
        ServiceType::CustomClearance,
        ServiceType::Relocation,
        ServiceType::OfficeShifting,
        ServiceType::FineArtHandling,
    ];

    /// Human label, also the stored value.
    pub fn label(self) -> &'static str {
        match self {
            ServiceType::PackingMoving => "Packing & Moving",
            ServiceType::Shipping => "Shipping Services",
            ServiceType::FreightForwarding => "Freight Forwarding",
            ServiceType::CustomClearance => "Custom Clearance",
            ServiceType::Relocation => "Relocation Services",
            ServiceType::OfficeShifting => "Office Shifting",
            ServiceType::FineArtHandling => "Fine Art Handling",
        }
    }

    /// URL slug of the matching service detail page.
    pub fn slug(self) -> &'static str {
        match self {
            ServiceType::PackingMoving => "packing-moving",
            ServiceType::Shipping => "shipping",
            ServiceType::FreightForwarding => "freight-forwarding",
            ServiceType::CustomClearance => "custom-clearance",
            ServiceType::Relocation => "relocation",
            ServiceType::OfficeShifting => "office-shifting",
            ServiceType::FineArtHandling => "fine-art-handling",
        }
    }

    /// One-paragraph pitch shown on the services pages.
    pub fn summary(self) -> &'static str {
        match self {
            ServiceType::PackingMoving => {
                "Professional packing with high-quality materials and expert techniques. We handle your belongings with care from start to finish."
            }
            ServiceType::Shipping => {
                "Reliable nationwide shipping for residential and commercial customers with real-time tracking."
            }
            ServiceType::FreightForwarding => {
                "International freight forwarding by land, sea and air with customs expertise and a global network."
            }
            ServiceType::CustomClearance => {
                "Customs clearance with proper documentation and compliance for smooth international shipping."
            }
            ServiceType::Relocation => {
                "Complete residential relocation including temporary storage, utility connections and settling-in assistance."
            }
            ServiceType::OfficeShifting => {
                "Business relocation planned to minimize downtime and executed efficiently."
            }
            ServiceType::FineArtHandling => {
                "Specialized handling and transport of artwork, antiques and delicate items with museum-quality care."
            }
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        ServiceType::ALL.into_iter().find(|s| s.slug() == slug)
    }
}

impl Display for ServiceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ServiceType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ServiceType::ALL
            .into_iter()
            .find(|service| service.label() == trimmed || service.slug() == trimmed)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown service `{s}`")))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QuoteRequest {
    pub id: QuoteRequestId,
    pub user_id: UserId,
    pub service_type: ServiceType,
    pub pickup_location: Location,
    pub delivery_location: Location,
    pub preferred_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub status: QuoteStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl QuoteRequest {
    /// Validates raw storage values.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: i32,
        user_id: i32,
        service_type: &str,
        pickup_location: String,
        delivery_location: String,
        preferred_date: Option<NaiveDate>,
        description: Option<String>,
        status: &str,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: QuoteRequestId::new(id)?,
            user_id: UserId::new(user_id)?,
            service_type: service_type.parse()?,
            pickup_location: Location::new(pickup_location)?,
            delivery_location: Location::new(delivery_location)?,
            preferred_date,
            description,
            status: status.parse()?,
            created_at,
            updated_at,
        })
    }
}

/// Request row as listed in the admin console, joined with its requester.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct QuoteRequestWithUser {
    pub request: QuoteRequest,
    pub user_email: String,
    pub user_name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewQuoteRequest {
    pub user_id: UserId,
    pub service_type: ServiceType,
    pub pickup_location: Location,
    pub delivery_location: Location,
    pub preferred_date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl NewQuoteRequest {
    #[must_use]
    pub fn new(
        user_id: UserId,
        service_type: ServiceType,
        pickup_location: Location,
        delivery_location: Location,
        preferred_date: Option<NaiveDate>,
        description: Option<String>,
    ) -> Self {
        Self {
            user_id,
            service_type,
            pickup_location,
            delivery_location,
            preferred_date,
            description: description
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}
