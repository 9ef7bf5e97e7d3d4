use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::dashboard::DashboardStats;
use crate::domain::quote_request::QuoteStatus;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DashboardReader, DieselRepository};

fn to_count(value: i64) -> usize {
    usize::try_from(value).unwrap_or_default()
}

impl DashboardReader for DieselRepository {
    fn dashboard_stats(&self, since: NaiveDateTime) -> RepositoryResult<DashboardStats> {
        use crate::schema::{contact_messages, quote_requests, users};

        let mut conn = self.conn()?;

        let per_status = quote_requests::table
            .group_by(quote_requests::status)
            .select((quote_requests::status, diesel::dsl::count_star()))
            .load::<(String, i64)>(&mut conn)?;

        let mut stats = DashboardStats::default();
        for (status, count) in per_status {
            let count = to_count(count);
            stats.total_quote_requests += count;
            match status.parse::<QuoteStatus>() {
                Ok(QuoteStatus::Pending) => stats.pending_requests = count,
                Ok(QuoteStatus::Quoted) => stats.quoted_requests = count,
                Ok(QuoteStatus::Accepted) => stats.accepted_requests = count,
                Ok(QuoteStatus::Completed) => stats.completed_requests = count,
                Ok(QuoteStatus::Cancelled) => stats.cancelled_requests = count,
                Err(err) => log::warn!("Unexpected quote status in storage: {err}"),
            }
        }

        stats.total_users = to_count(users::table.count().get_result(&mut conn)?);
        stats.recent_requests = to_count(
            quote_requests::table
                .filter(quote_requests::created_at.ge(since))
                .count()
                .get_result(&mut conn)?,
        );
        stats.recent_users = to_count(
            users::table
                .filter(users::created_at.ge(since))
                .count()
                .get_result(&mut conn)?,
        );
        stats.contact_messages =
            to_count(contact_messages::table.count().get_result(&mut conn)?);

        Ok(stats)
    }
}
