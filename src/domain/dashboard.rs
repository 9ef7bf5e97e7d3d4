use serde::Serialize;

/// Aggregated counters shown on the admin dashboard.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_quote_requests: usize,
    pub total_users: usize,
    pub pending_requests: usize,
    pub quoted_requests: usize,
    pub accepted_requests: usize,
    pub completed_requests: usize,
    pub cancelled_requests: usize,
    pub recent_requests: usize,
    pub recent_users: usize,
    pub contact_messages: usize,
}
