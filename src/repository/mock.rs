//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

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
use crate::repository::{
    AdminUserReader, AdminUserWriter, ContactWriter, DashboardReader, LedgerReader, LedgerWriter,
    QuoteRequestListQuery, QuoteRequestReader, QuoteRequestWriter, UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
        fn list_user_summaries(&self) -> RepositoryResult<Vec<UserSummary>>;
    }

    impl UserWriter for Repository {
        fn upsert_user(&self, user: &NewUser, signed_in_at: NaiveDateTime) -> RepositoryResult<User>;
    }

    impl AdminUserReader for Repository {
        fn get_admin_by_user_id(&self, user_id: UserId) -> RepositoryResult<Option<AdminUser>>;
        fn get_admin_by_id(&self, id: AdminUserId) -> RepositoryResult<Option<AdminUser>>;
        fn list_admin_users(&self) -> RepositoryResult<Vec<AdminUserWithUser>>;
    }

    impl AdminUserWriter for Repository {
        fn grant_admin_role(&self, admin: &NewAdminUser) -> RepositoryResult<AdminUser>;
        fn set_admin_active(&self, id: AdminUserId, is_active: bool) -> RepositoryResult<AdminUser>;
    }

    impl QuoteRequestReader for Repository {
        fn get_quote_request(&self, id: QuoteRequestId) -> RepositoryResult<Option<QuoteRequest>>;
        fn list_quote_requests(
            &self,
            query: QuoteRequestListQuery,
        ) -> RepositoryResult<Vec<QuoteRequestWithUser>>;
        fn list_quote_messages(&self, id: QuoteRequestId) -> RepositoryResult<Vec<QuoteMessage>>;
    }

    impl QuoteRequestWriter for Repository {
        fn create_quote_request(&self, request: &NewQuoteRequest) -> RepositoryResult<QuoteRequest>;
        fn add_quote_message(&self, message: &NewQuoteMessage) -> RepositoryResult<QuoteMessage>;
        fn transition_quote_request<'a>(
            &self,
            id: QuoteRequestId,
            from: QuoteStatus,
            to: QuoteStatus,
            message: Option<&'a NewQuoteMessage>,
        ) -> RepositoryResult<QuoteRequest>;
    }

    impl LedgerReader for Repository {
        fn get_ledger(&self, id: &LedgerId) -> RepositoryResult<Option<Ledger>>;
        fn list_ledgers(&self, kind: LedgerKind) -> RepositoryResult<Vec<Ledger>>;
    }

    impl LedgerWriter for Repository {
        fn save_ledger(&self, ledger: &Ledger) -> RepositoryResult<Ledger>;
    }

    impl ContactWriter for Repository {
        fn create_contact_message(
            &self,
            message: &NewContactMessage,
        ) -> RepositoryResult<ContactMessage>;
    }

    impl DashboardReader for Repository {
        fn dashboard_stats(&self, since: NaiveDateTime) -> RepositoryResult<DashboardStats>;
    }
}
