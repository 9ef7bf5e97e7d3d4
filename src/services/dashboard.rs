//! Admin dashboard counters.

use chrono::{Duration, NaiveDateTime};

use crate::domain::admin_user::AdminAccess;
use crate::domain::dashboard::DashboardStats;
use crate::domain::quote_request::QuoteRequestWithUser;
use crate::repository::{DashboardReader, QuoteRequestListQuery, QuoteRequestReader};
use crate::services::auth::require_admin;
use crate::services::{ServiceError, ServiceResult};

/// Window counted as "recent" on the dashboard.
pub const RECENT_WINDOW_DAYS: i64 = 7;
const LATEST_REQUESTS: usize = 5;

#[derive(Debug)]
pub struct DashboardPageData {
    pub stats: DashboardStats,
    pub latest_requests: Vec<QuoteRequestWithUser>,
}

pub fn load_dashboard<R>(
    repo: &R,
    access: AdminAccess,
    now: NaiveDateTime,
) -> ServiceResult<DashboardPageData>
where
    R: DashboardReader + QuoteRequestReader + ?Sized,
{
    require_admin(access)?;

    let since = now - Duration::days(RECENT_WINDOW_DAYS);
    let stats = repo.dashboard_stats(since).map_err(|err| {
        log::error!("Failed to load dashboard stats: {err}");
        ServiceError::from(err)
    })?;

    let mut latest_requests = repo.list_quote_requests(QuoteRequestListQuery::new())?;
    latest_requests.truncate(LATEST_REQUESTS);

    Ok(DashboardPageData {
        stats,
        latest_requests,
    })
}
