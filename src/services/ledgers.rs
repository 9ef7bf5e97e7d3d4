//! Invoice and quote documents kept in the database with a local JSON copy
//! as fallback.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::admin_user::AdminAccess;
use crate::domain::ledger::{Ledger, LedgerKind};
use crate::domain::types::LedgerId;
use crate::forms::ledger::{LedgerCommand, LedgerPayload};
use crate::repository::{LedgerReader, LedgerWriter};
use crate::services::auth::require_admin;
use crate::services::{ServiceError, ServiceResult};

/// Result of persisting a ledger to the primary and local stores.
#[derive(Debug)]
pub enum SaveOutcome {
    SavedRemote(Ledger),
    SavedLocalOnly { ledger: Ledger, reason: String },
    Failed { remote: String, local: String },
}

impl SaveOutcome {
    pub fn ledger(&self) -> Option<&Ledger> {
        match self {
            SaveOutcome::SavedRemote(ledger) | SaveOutcome::SavedLocalOnly { ledger, .. } => {
                Some(ledger)
            }
            SaveOutcome::Failed { .. } => None,
        }
    }
}

/// What a builder submission produced.
#[derive(Debug)]
pub enum LedgerSubmission {
    /// Items were added or removed; nothing was stored.
    Edited(Ledger),
    Saved(SaveOutcome),
}

/// Writes to the primary store and falls back to the local one.
pub fn persist_ledger<P, L>(primary: &P, local: &L, ledger: &Ledger) -> SaveOutcome
where
    P: LedgerWriter + ?Sized,
    L: LedgerWriter + ?Sized,
{
    let remote = match primary.save_ledger(ledger) {
        Ok(saved) => return SaveOutcome::SavedRemote(saved),
        Err(err) => err,
    };
    log::warn!("Saving {} {} to the database failed: {remote}", ledger.kind, ledger.id);

    match local.save_ledger(ledger) {
        Ok(saved) => SaveOutcome::SavedLocalOnly {
            ledger: saved,
            reason: remote.to_string(),
        },
        Err(local) => {
            log::error!("Saving {} {} locally failed: {local}", ledger.kind, ledger.id);
            SaveOutcome::Failed {
                remote: remote.to_string(),
                local: local.to_string(),
            }
        }
    }
}

/// Blank document for the builder.
pub fn new_ledger(access: AdminAccess, kind: LedgerKind, now: DateTime<Utc>) -> ServiceResult<Ledger> {
    require_admin(access)?;
    Ok(Ledger::new(kind, now))
}

/// Applies the builder command; only `Save` touches the stores.
pub fn submit_ledger<P, L>(
    primary: &P,
    local: &L,
    access: AdminAccess,
    payload: LedgerPayload,
    now: DateTime<Utc>,
) -> ServiceResult<LedgerSubmission>
where
    P: LedgerWriter + ?Sized,
    L: LedgerWriter + ?Sized,
{
    require_admin(access)?;

    let LedgerPayload {
        mut ledger,
        command,
    } = payload;

    match command {
        LedgerCommand::AddItem => {
            ledger.add_item();
            Ok(LedgerSubmission::Edited(ledger))
        }
        LedgerCommand::RemoveItem(id) => {
            ledger.remove_item(&id);
            Ok(LedgerSubmission::Edited(ledger))
        }
        LedgerCommand::Save => {
            ledger.touch(now);
            Ok(LedgerSubmission::Saved(persist_ledger(primary, local, &ledger)))
        }
    }
}

/// Primary store first, local copy second. Ledgers of another kind are
/// treated as missing.
pub fn load_ledger<P, L>(
    primary: &P,
    local: &L,
    access: AdminAccess,
    kind: LedgerKind,
    id: &LedgerId,
) -> ServiceResult<Ledger>
where
    P: LedgerReader + ?Sized,
    L: LedgerReader + ?Sized,
{
    require_admin(access)?;

    let remote = match primary.get_ledger(id) {
        Ok(found) => found,
        Err(err) => {
            log::warn!("Reading ledger {id} from the database failed: {err}");
            None
        }
    };

    let ledger = match remote {
        Some(ledger) => Some(ledger),
        None => local.get_ledger(id)?,
    };

    ledger
        .filter(|ledger| ledger.kind == kind)
        .ok_or(ServiceError::NotFound)
}

/// Ledgers from both stores merged by id, the database copy winning,
/// most recently updated first.
pub fn list_ledgers<P, L>(
    primary: &P,
    local: &L,
    access: AdminAccess,
    kind: LedgerKind,
) -> ServiceResult<Vec<Ledger>>
where
    P: LedgerReader + ?Sized,
    L: LedgerReader + ?Sized,
{
    require_admin(access)?;

    let remote = primary.list_ledgers(kind);
    let stored = local.list_ledgers(kind);

    let (remote, stored) = match (remote, stored) {
        (Err(remote), Err(local)) => {
            log::error!("Listing {} failed in both stores: {remote}; {local}", kind.plural());
            return Err(remote.into());
        }
        (Ok(remote), Ok(stored)) => (remote, stored),
        (Ok(remote), Err(err)) => {
            log::warn!("Listing local {} failed: {err}", kind.plural());
            (remote, Vec::new())
        }
        (Err(err), Ok(stored)) => {
            log::warn!("Listing {} from the database failed: {err}", kind.plural());
            (Vec::new(), stored)
        }
    };

    Ok(merge_ledgers(remote, stored))
}

fn merge_ledgers(remote: Vec<Ledger>, stored: Vec<Ledger>) -> Vec<Ledger> {
    let seen: HashSet<LedgerId> = remote.iter().map(|ledger| ledger.id.clone()).collect();
    let mut merged = remote;
    merged.extend(stored.into_iter().filter(|ledger| !seen.contains(&ledger.id)));
    merged.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    merged
}


#[cfg(all(test, feature = "test-mocks"))]
mod mock_tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::admin_user::AdminRole;
    use crate::repository::errors::RepositoryError;
    use crate::repository::local::JsonLedgerStore;
    use crate::repository::mock::MockRepository;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn granted() -> AdminAccess {
        AdminAccess::Granted {
            role: AdminRole::Admin,
        }
    }

    fn quote() -> Ledger {
        let mut ledger = Ledger::new(LedgerKind::Quote, now());
        ledger.client_name = "Acme".into();
        ledger
    }

    fn failing_primary() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_save_ledger()
            .returning(|_| Err(RepositoryError::ConnectionError("db offline".into())));
        repo
    }

    #[test]
    fn primary_success_is_saved_remote() {
        let dir = tempfile::tempdir().expect("tempdir");
        let local = JsonLedgerStore::new(dir.path());
        let mut repo = MockRepository::new();
        repo.expect_save_ledger()
            .times(1)
            .returning(|ledger| Ok(ledger.clone()));

        let outcome = persist_ledger(&repo, &local, &quote());

        assert!(matches!(outcome, SaveOutcome::SavedRemote(_)));
        assert!(local.list_ledgers(LedgerKind::Quote).expect("list").is_empty());
    }

    #[test]
    fn primary_failure_falls_back_to_local_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let local = JsonLedgerStore::new(dir.path());
        let ledger = quote();

        let outcome = persist_ledger(&failing_primary(), &local, &ledger);

        match outcome {
            SaveOutcome::SavedLocalOnly { ledger: saved, reason } => {
                assert_eq!(saved.id, ledger.id);
                assert!(reason.contains("db offline"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(local.get_ledger(&ledger.id).expect("get").is_some());
    }

    #[test]
    fn both_stores_failing_reports_both_reasons() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").expect("write");
        let local = JsonLedgerStore::new(&blocker);

        let outcome = persist_ledger(&failing_primary(), &local, &quote());

        match outcome {
            SaveOutcome::Failed { remote, local } => {
                assert!(remote.contains("db offline"));
                assert!(!local.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn load_falls_back_to_local_copy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let local = JsonLedgerStore::new(dir.path());
        let ledger = quote();
        local.save_ledger(&ledger).expect("save");

        let mut repo = MockRepository::new();
        repo.expect_get_ledger().returning(|_| Ok(None));

        let loaded =
            load_ledger(&repo, &local, granted(), LedgerKind::Quote, &ledger.id).expect("load");
        assert_eq!(loaded.client_name, "Acme");

        let wrong_kind = load_ledger(&repo, &local, granted(), LedgerKind::Invoice, &ledger.id);
        assert!(matches!(wrong_kind, Err(ServiceError::NotFound)));
    }

    #[test]
    fn list_survives_primary_outage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let local = JsonLedgerStore::new(dir.path());
        local.save_ledger(&quote()).expect("save");

        let mut repo = MockRepository::new();
        repo.expect_list_ledgers()
            .returning(|_| Err(RepositoryError::ConnectionError("db offline".into())));

        let listed = list_ledgers(&repo, &local, granted(), LedgerKind::Quote).expect("list");
        assert_eq!(listed.len(), 1);
    }
}
