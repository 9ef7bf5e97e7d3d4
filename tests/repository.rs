use chrono::{Duration, TimeZone, Utc};
use wing_movers::domain::admin_user::{AdminAccess, AdminRole, NewAdminUser};
use wing_movers::domain::contact::NewContactMessage;
use wing_movers::domain::ledger::{Ledger, LedgerKind, NumericInput};
use wing_movers::domain::quote_message::NewQuoteMessage;
use wing_movers::domain::quote_request::{NewQuoteRequest, QuoteStatus, ServiceType};
use wing_movers::domain::types::{
    Location, MessageText, PersonName, Price, QuoteRequestId, UserEmail,
};
use wing_movers::repository::errors::RepositoryError;
use wing_movers::repository::{
    AdminUserReader, AdminUserWriter, ContactWriter, DashboardReader, LedgerReader, LedgerWriter,
    QuoteRequestListQuery, QuoteRequestReader, QuoteRequestWriter, UserReader,
};

mod common;

fn new_request(user_id: wing_movers::domain::types::UserId) -> NewQuoteRequest {
    NewQuoteRequest::new(
        user_id,
        ServiceType::PackingMoving,
        Location::new("Dubai Marina").unwrap(),
        Location::new("Jumeirah").unwrap(),
        None,
        Some("  Two bedroom flat ".into()),
    )
}

#[test]
fn test_user_upsert_refreshes_profile() {
    let test_db = common::TestDb::new("test_user_upsert_refreshes_profile.db");
    let repo = test_db.repo();

    let first = common::sign_in(&repo, "auth|1", "first@example.com");
    let second = common::sign_in(&repo, "auth|1", "Changed@Example.com");

    assert_eq!(first.id, second.id);
    assert_eq!(second.email.as_str(), "changed@example.com");
    assert!(second.last_sign_in_at.is_some());

    let email = UserEmail::new("changed@example.com").unwrap();
    assert_eq!(repo.get_user_by_email(&email).unwrap().map(|u| u.id), Some(first.id));
}

#[test]
fn test_admin_roles_and_toggle() {
    let test_db = common::TestDb::new("test_admin_roles_and_toggle.db");
    let repo = test_db.repo();
    let user = common::sign_in(&repo, "auth|2", "ops@example.com");

    assert!(repo.get_admin_by_user_id(user.id).unwrap().is_none());

    let admin = repo
        .grant_admin_role(&NewAdminUser::new(user.id, AdminRole::Moderator))
        .unwrap();
    assert!(admin.is_active);
    assert!(AdminAccess::from(Some(&admin)).is_granted());

    let deactivated = repo.set_admin_active(admin.id, false).unwrap();
    assert!(!deactivated.is_active);
    assert_eq!(AdminAccess::from(Some(&deactivated)), AdminAccess::Denied);

    // Granting again reactivates and changes the role on the same record.
    let regranted = repo
        .grant_admin_role(&NewAdminUser::new(user.id, AdminRole::Admin))
        .unwrap();
    assert_eq!(regranted.id, admin.id);
    assert_eq!(regranted.role, AdminRole::Admin);
    assert!(regranted.is_active);

    let listed = repo.list_admin_users().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].user.email.as_str(), "ops@example.com");
}

#[test]
fn test_quote_request_lifecycle() {
    let test_db = common::TestDb::new("test_quote_request_lifecycle.db");
    let repo = test_db.repo();
    let customer = common::sign_in(&repo, "auth|3", "customer@example.com");
    let staff = common::sign_in(&repo, "auth|4", "staff@example.com");

    let request = repo.create_quote_request(&new_request(customer.id)).unwrap();
    assert_eq!(request.status, QuoteStatus::Pending);
    assert_eq!(request.description.as_deref(), Some("Two bedroom flat"));

    repo.add_quote_message(&NewQuoteMessage::from_customer(
        request.id,
        customer.id,
        MessageText::new("Is Saturday possible?").unwrap(),
    ))
    .unwrap();

    let offer = NewQuoteMessage::from_admin(
        request.id,
        staff.id,
        MessageText::new("Saturday works").unwrap(),
        Some(Price::new(1500.0).unwrap()),
        None,
    );
    let quoted = repo
        .transition_quote_request(request.id, QuoteStatus::Pending, QuoteStatus::Quoted, Some(&offer))
        .unwrap();
    assert_eq!(quoted.status, QuoteStatus::Quoted);

    let messages = repo.list_quote_messages(request.id).unwrap();
    assert_eq!(messages.len(), 2);
    assert!(!messages[0].is_admin);
    assert!(messages[1].is_offer());

    // A stale `from` status is rejected and nothing is written.
    let stale = repo.transition_quote_request(
        request.id,
        QuoteStatus::Pending,
        QuoteStatus::Cancelled,
        None,
    );
    assert!(matches!(stale, Err(RepositoryError::ConstraintViolation(_))));
    assert_eq!(
        repo.get_quote_request(request.id).unwrap().unwrap().status,
        QuoteStatus::Quoted
    );

    let missing = repo.transition_quote_request(
        QuoteRequestId::new(999).unwrap(),
        QuoteStatus::Pending,
        QuoteStatus::Quoted,
        None,
    );
    assert!(matches!(missing, Err(RepositoryError::NotFound)));
}

#[test]
fn test_quote_request_listing_filters() {
    let test_db = common::TestDb::new("test_quote_request_listing_filters.db");
    let repo = test_db.repo();
    let alice = common::sign_in(&repo, "auth|5", "alice@example.com");
    let bob = common::sign_in(&repo, "auth|6", "bob@example.com");

    let first = repo.create_quote_request(&new_request(alice.id)).unwrap();
    repo.create_quote_request(&new_request(bob.id)).unwrap();
    repo.transition_quote_request(first.id, QuoteStatus::Pending, QuoteStatus::Cancelled, None)
        .unwrap();

    let all = repo.list_quote_requests(QuoteRequestListQuery::new()).unwrap();
    assert_eq!(all.len(), 2);

    let mine = repo
        .list_quote_requests(QuoteRequestListQuery::new().user(alice.id))
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].user_email, "alice@example.com");

    let pending = repo
        .list_quote_requests(QuoteRequestListQuery::new().status(QuoteStatus::Pending))
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].request.user_id, bob.id);

    let summaries = repo.list_user_summaries().unwrap();
    let alice_summary = summaries.iter().find(|s| s.user.id == alice.id).unwrap();
    assert_eq!(alice_summary.quote_requests_count, 1);
    assert_eq!(alice_summary.completed_requests_count, 0);
}

#[test]
fn test_dashboard_counts() {
    let test_db = common::TestDb::new("test_dashboard_counts.db");
    let repo = test_db.repo();
    let user = common::sign_in(&repo, "auth|7", "user@example.com");
    repo.create_quote_request(&new_request(user.id)).unwrap();
    repo.create_contact_message(&NewContactMessage {
        name: PersonName::new("Sara").unwrap(),
        email: UserEmail::new("sara@example.com").unwrap(),
        phone: None,
        service: None,
        message: MessageText::new("Hello").unwrap(),
    })
    .unwrap();

    let since = (Utc::now() - Duration::days(7)).naive_utc();
    let stats = repo.dashboard_stats(since).unwrap();

    assert_eq!(stats.total_quote_requests, 1);
    assert_eq!(stats.pending_requests, 1);
    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.recent_requests, 1);
    assert_eq!(stats.contact_messages, 1);
}

#[test]
fn test_ledger_save_is_an_upsert() {
    let test_db = common::TestDb::new("test_ledger_save_is_an_upsert.db");
    let repo = test_db.repo();

    let created = Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap();
    let mut ledger = Ledger::new(LedgerKind::Invoice, created);
    ledger.client_name = "Acme".into();
    ledger.items[0].title = "Boxes".into();
    ledger.items[0].quantity = Some(NumericInput::new("3"));
    ledger.items[0].unit_price = Some(NumericInput::new("20"));
    ledger.add_item();

    let saved = repo.save_ledger(&ledger).unwrap();
    assert_eq!(saved.items.len(), 2);

    let mut edited = saved.clone();
    edited.remove_item(&saved.items[1].id);
    edited.client_name = "Acme LLC".into();
    edited.created_at = created + Duration::days(3);
    edited.touch(created + Duration::days(3));
    repo.save_ledger(&edited).unwrap();

    let loaded = repo.get_ledger(&ledger.id).unwrap().expect("stored");
    assert_eq!(loaded.client_name, "Acme LLC");
    assert_eq!(loaded.items.len(), 1);
    assert_eq!(loaded.created_at, created);
    assert_eq!(loaded.totals().subtotal, 60.0);

    assert_eq!(repo.list_ledgers(LedgerKind::Invoice).unwrap().len(), 1);
    assert!(repo.list_ledgers(LedgerKind::Quote).unwrap().is_empty());
}

#[test]
fn test_ledgers_may_share_item_ids() {
    let test_db = common::TestDb::new("test_ledgers_may_share_item_ids.db");
    let repo = test_db.repo();
    let now = Utc.with_ymd_and_hms(2025, 5, 2, 8, 0, 0).unwrap();

    let first = Ledger::new(LedgerKind::Quote, now);
    let mut copy = Ledger::new(LedgerKind::Quote, now);
    copy.items = first.items.clone();

    repo.save_ledger(&first).unwrap();
    repo.save_ledger(&copy).unwrap();

    assert_eq!(repo.get_ledger(&copy.id).unwrap().unwrap().items, first.items);
    assert_eq!(repo.list_ledgers(LedgerKind::Quote).unwrap().len(), 2);
}
