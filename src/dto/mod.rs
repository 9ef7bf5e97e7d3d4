//! View models that bridge services with templates.

pub mod ledgers;
pub mod quotes;
pub mod users;

/// Display format for timestamps across templates.
pub const DATETIME_FORMAT: &str = "%d %b %Y %H:%M";
pub const DATE_FORMAT: &str = "%d %b %Y";
