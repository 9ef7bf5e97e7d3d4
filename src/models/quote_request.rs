//! Diesel models for quote requests.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::quote_request::{
    NewQuoteRequest as DomainNewQuoteRequest, QuoteRequest as DomainQuoteRequest,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::quote_requests)]
/// Diesel model for [`crate::domain::quote_request::QuoteRequest`].
pub struct QuoteRequest {
    pub id: i32,
    pub user_id: i32,
    pub service_type: String,
    pub pickup_location: String,
    pub delivery_location: String,
    pub preferred_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::quote_requests)]
/// Insertable form of [`QuoteRequest`]. New requests always start pending.
pub struct NewQuoteRequest<'a> {
    pub user_id: i32,
    pub service_type: &'a str,
    pub pickup_location: &'a str,
    pub delivery_location: &'a str,
    pub preferred_date: Option<NaiveDate>,
    pub description: Option<&'a str>,
    pub status: &'a str,
}

impl TryFrom<QuoteRequest> for DomainQuoteRequest {
    type Error = TypeConstraintError;

    fn try_from(request: QuoteRequest) -> Result<Self, Self::Error> {
        DomainQuoteRequest::try_new(
            request.id,
            request.user_id,
            &request.service_type,
            request.pickup_location,
            request.delivery_location,
            request.preferred_date,
            request.description,
            &request.status,
            request.created_at,
            request.updated_at,
        )
    }
}

impl<'a> From<&'a DomainNewQuoteRequest> for NewQuoteRequest<'a> {
    fn from(request: &'a DomainNewQuoteRequest) -> Self {
        Self {
            user_id: request.user_id.get(),
            service_type: request.service_type.label(),
            pickup_location: request.pickup_location.as_str(),
            delivery_location: request.delivery_location.as_str(),
            preferred_date: request.preferred_date,
            description: request.description.as_deref(),
            status: "pending",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote_request::{QuoteStatus, ServiceType};
    use crate::domain::types::{Location, UserId};
    use chrono::DateTime;

    #[test]
    fn from_domain_new_request_is_pending() {
        let domain = DomainNewQuoteRequest::new(
            UserId::new(2).expect("id"),
            ServiceType::Relocation,
            Location::new("Dubai Marina").expect("pickup"),
            Location::new("Abu Dhabi").expect("delivery"),
            None,
            Some("   ".into()),
        );
        let new: NewQuoteRequest = (&domain).into();
        assert_eq!(new.service_type, "Relocation Services");
        assert_eq!(new.status, "pending");
        assert_eq!(new.description, None);
    }

    #[test]
    fn from_db_into_domain() {
        let now = DateTime::from_timestamp(1_700_000_000, 0)
            .expect("valid timestamp")
            .naive_utc();
        let db = QuoteRequest {
            id: 5,
            user_id: 2,
            service_type: "Shipping Services".into(),
            pickup_location: "Deira".into(),
            delivery_location: "Sharjah".into(),
            preferred_date: None,
            description: None,
            status: "quoted".into(),
            created_at: now,
            updated_at: now,
        };
        let domain = DomainQuoteRequest::try_from(db).expect("valid request");
        assert_eq!(domain.service_type, ServiceType::Shipping);
        assert_eq!(domain.status, QuoteStatus::Quoted);
    }
}
