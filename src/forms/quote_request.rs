//! Customer quote request form.

use serde::Deserialize;
use validator::Validate;

use crate::domain::quote_request::{NewQuoteRequest, ServiceType};
use crate::domain::types::{Location, UserId};
use crate::forms::{FormError, non_blank, parse_optional_date};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct QuoteRequestForm {
    #[validate(length(min = 1))]
    pub service_type: String,
    #[validate(length(min = 1, max = 500))]
    pub pickup_location: String,
    #[validate(length(min = 1, max = 500))]
    pub delivery_location: String,
    #[serde(default)]
    pub preferred_date: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
}

/// Validated quote request waiting for its owner.
pub struct QuoteRequestPayload {
    pub service_type: ServiceType,
    pub pickup_location: Location,
    pub delivery_location: Location,
    pub preferred_date: Option<chrono::NaiveDate>,
    pub description: Option<String>,
}

impl TryFrom<QuoteRequestForm> for QuoteRequestPayload {
    type Error = FormError;

    fn try_from(form: QuoteRequestForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            service_type: form
                .service_type
                .parse()
                .map_err(|_| FormError::InvalidService)?,
            pickup_location: Location::new(form.pickup_location)
                .map_err(|_| FormError::InvalidLocation)?,
            delivery_location: Location::new(form.delivery_location)
                .map_err(|_| FormError::InvalidLocation)?,
            preferred_date: parse_optional_date(&form.preferred_date)?,
            description: non_blank(&ammonia::clean(&form.description)),
        })
    }
}

impl QuoteRequestPayload {
    pub fn into_domain(self, user_id: UserId) -> NewQuoteRequest {
        NewQuoteRequest::new(
            user_id,
            self.service_type,
            self.pickup_location,
            self.delivery_location,
            self.preferred_date,
            self.description,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> QuoteRequestForm {
        QuoteRequestForm {
            service_type: "Office Shifting".into(),
            pickup_location: " Business Bay ".into(),
            delivery_location: "JLT".into(),
            preferred_date: "2025-07-01".into(),
            description: String::new(),
        }
    }

    #[test]
    fn converts_valid_form() {
        let payload = QuoteRequestPayload::try_from(form()).expect("valid");
        assert_eq!(payload.service_type, ServiceType::OfficeShifting);
        assert_eq!(payload.pickup_location.as_str(), "Business Bay");
        assert!(payload.preferred_date.is_some());
        assert!(payload.description.is_none());
    }

    #[test]
    fn unknown_service_is_rejected() {
        let mut bad = form();
        bad.service_type = "Teleportation".into();
        assert!(matches!(
            QuoteRequestPayload::try_from(bad),
            Err(FormError::InvalidService)
        ));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut bad = form();
        bad.preferred_date = "next week".into();
        assert!(matches!(
            QuoteRequestPayload::try_from(bad),
            Err(FormError::InvalidDate)
        ));
    }
}
