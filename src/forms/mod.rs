//! Form definitions backing the site routes.

use chrono::NaiveDate;
use thiserror::Error;
use validator::ValidationErrors;

pub mod admin_users;
pub mod contact;
pub mod ledger;
pub mod quote_request;
pub mod quotes;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("malformed form data: {0}")]
    Malformed(String),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid location")]
    InvalidLocation,

    #[error("unknown service")]
    InvalidService,

    #[error("invalid date")]
    InvalidDate,

    #[error("message cannot be empty")]
    InvalidMessage,

    #[error("invalid price")]
    InvalidPrice,

    #[error("unknown role")]
    InvalidRole,

    #[error("unknown action")]
    InvalidAction,

    #[error("invalid identifier")]
    InvalidId,

    #[error("client name is required")]
    MissingClientName,
}

/// Parses an optional `YYYY-MM-DD` date input; blank means absent.
pub(crate) fn parse_optional_date(value: &str) -> Result<Option<NaiveDate>, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FormError::InvalidDate)
}

/// Trims the input, mapping blank to `None`.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
