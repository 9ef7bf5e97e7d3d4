use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::admin_user::{AdminUser, AdminUserWithUser, NewAdminUser};
use crate::domain::contact::{ContactMessage, NewContactMessage};
use crate::domain::dashboard::DashboardStats;
use crate::domain::ledger::{Ledger, LedgerKind};
use crate::domain::quote_message::{NewQuoteMessage, QuoteMessage};
use crate::domain::quote_request::{
    NewQuoteRequest, QuoteRequest, QuoteRequestWithUser, QuoteStatus,
};
use crate::domain::types::{AdminUserId, LedgerId, QuoteRequestId, UserEmail, UserId};
use crate::domain::user::{NewUser, User, UserSummary};
use crate::repository::errors::RepositoryResult;

pub mod admin_user;
pub mod contact;
pub mod dashboard;
pub mod errors;
pub mod ledger;
pub mod local;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod quote_request;
pub mod user;

/// Diesel-backed repository sharing one SQLite connection pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuoteRequestListQuery {
    pub user_id: Option<UserId>,
    pub status: Option<QuoteStatus>,
}

impl QuoteRequestListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn status(mut self, status: QuoteStatus) -> Self {
        self.status = Some(status);
        self
    }
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
    /// Users with their request counters, newest first.
    fn list_user_summaries(&self) -> RepositoryResult<Vec<UserSummary>>;
}

pub trait UserWriter {
    /// Inserts the user or refreshes the stored email, name and sign-in time.
    fn upsert_user(&self, user: &NewUser, signed_in_at: NaiveDateTime) -> RepositoryResult<User>;
}

pub trait AdminUserReader {
    fn get_admin_by_user_id(&self, user_id: UserId) -> RepositoryResult<Option<AdminUser>>;
    fn get_admin_by_id(&self, id: AdminUserId) -> RepositoryResult<Option<AdminUser>>;
    fn list_admin_users(&self) -> RepositoryResult<Vec<AdminUserWithUser>>;
}

pub trait AdminUserWriter {
    /// Grants the role, reactivating and re-roling an existing record.
    fn grant_admin_role(&self, admin: &NewAdminUser) -> RepositoryResult<AdminUser>;
    fn set_admin_active(&self, id: AdminUserId, is_active: bool) -> RepositoryResult<AdminUser>;
}

pub trait QuoteRequestReader {
    fn get_quote_request(&self, id: QuoteRequestId) -> RepositoryResult<Option<QuoteRequest>>;
    /// Requests matching the query, newest first, joined with the requester.
    fn list_quote_requests(
        &self,
        query: QuoteRequestListQuery,
    ) -> RepositoryResult<Vec<QuoteRequestWithUser>>;
    /// Thread of a request ordered oldest first.
    fn list_quote_messages(&self, id: QuoteRequestId) -> RepositoryResult<Vec<QuoteMessage>>;
}

pub trait QuoteRequestWriter {
    fn create_quote_request(&self, request: &NewQuoteRequest) -> RepositoryResult<QuoteRequest>;
    fn add_quote_message(&self, message: &NewQuoteMessage) -> RepositoryResult<QuoteMessage>;
    /// Moves the request from `from` to `to` and appends `message`, if any, in
    /// one transaction. Fails with a constraint violation when the stored
    /// status is no longer `from`.
    fn transition_quote_request(
        &self,
        id: QuoteRequestId,
        from: QuoteStatus,
        to: QuoteStatus,
        message: Option<&NewQuoteMessage>,
    ) -> RepositoryResult<QuoteRequest>;
}

pub trait LedgerReader {
    fn get_ledger(&self, id: &LedgerId) -> RepositoryResult<Option<Ledger>>;
    /// Ledgers of one kind, most recently updated first.
    fn list_ledgers(&self, kind: LedgerKind) -> RepositoryResult<Vec<Ledger>>;
}

pub trait LedgerWriter {
    /// Upserts the whole ledger. The stored `created_at` wins over the
    /// incoming one; the returned ledger is what was written.
    fn save_ledger(&self, ledger: &Ledger) -> RepositoryResult<Ledger>;
}

pub trait ContactWriter {
    fn create_contact_message(
        &self,
        message: &NewContactMessage,
    ) -> RepositoryResult<ContactMessage>;
}

pub trait DashboardReader {
    /// Counters for the dashboard; "recent" means created at or after `since`.
    fn dashboard_stats(&self, since: NaiveDateTime) -> RepositoryResult<DashboardStats>;
}
