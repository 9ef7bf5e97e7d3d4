//! Domain aggregates exposed by the service layer.

pub mod admin_user;
pub mod contact;
pub mod dashboard;
pub mod ledger;
pub mod quote_message;
pub mod quote_request;
pub mod types;
pub mod user;
