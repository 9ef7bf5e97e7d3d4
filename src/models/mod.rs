//! Database models shared across the repository layer.

pub mod admin_user;
pub mod config;
pub mod contact;
pub mod ledger;
pub mod quote_message;
pub mod quote_request;
pub mod user;
