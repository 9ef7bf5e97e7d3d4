//! JSON file store standing in for the browser-local copy of ledgers.
//!
//! Each kind lives in its own file (`invoices.json`, `quotes.json`) holding
//! an array of ledgers in the camelCase export format. Writes go to a
//! temporary file first and are renamed into place.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::domain::ledger::{Ledger, LedgerKind};
use crate::domain::types::LedgerId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{LedgerReader, LedgerWriter};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed ledger file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for LocalStoreError {
    fn from(_: PoisonError<T>) -> Self {
        LocalStoreError::Poisoned
    }
}

/// Filesystem-backed ledger store.
#[derive(Debug)]
pub struct JsonLedgerStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl JsonLedgerStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, kind: LedgerKind) -> PathBuf {
        self.root.join(format!("{}.json", kind.plural()))
    }

    fn read_kind(&self, kind: LedgerKind) -> Result<Vec<Ledger>, LocalStoreError> {
        let data = match fs::read_to_string(self.path_for(kind)) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut ledgers: Vec<Ledger> = serde_json::from_str(&data)?;
        // Files written by older builders carry no kind tag.
        for ledger in &mut ledgers {
            ledger.kind = kind;
        }
        Ok(ledgers)
    }

    fn write_kind(&self, kind: LedgerKind, ledgers: &[Ledger]) -> Result<(), LocalStoreError> {
        let path = self.path_for(kind);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &serde_json::to_string_pretty(ledgers)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn get(&self, id: &LedgerId) -> Result<Option<Ledger>, LocalStoreError> {
        let _guard = self.lock.lock()?;
        for kind in LedgerKind::ALL {
            if let Some(ledger) = self.read_kind(kind)?.into_iter().find(|l| &l.id == id) {
                return Ok(Some(ledger));
            }
        }
        Ok(None)
    }

    fn list(&self, kind: LedgerKind) -> Result<Vec<Ledger>, LocalStoreError> {
        let _guard = self.lock.lock()?;
        let mut ledgers = self.read_kind(kind)?;
        ledgers.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(ledgers)
    }

    fn upsert(&self, ledger: &Ledger) -> Result<Ledger, LocalStoreError> {
        let _guard = self.lock.lock()?;
        let mut ledgers = self.read_kind(ledger.kind)?;
        let mut stored = ledger.clone();

        match ledgers.iter_mut().find(|existing| existing.id == ledger.id) {
            Some(existing) => {
                stored.created_at = existing.created_at;
                *existing = stored.clone();
            }
            None => ledgers.push(stored.clone()),
        }

        self.write_kind(ledger.kind, &ledgers)?;
        Ok(stored)
    }
}

impl LedgerReader for JsonLedgerStore {
    fn get_ledger(&self, id: &LedgerId) -> RepositoryResult<Option<Ledger>> {
        Ok(self.get(id)?)
    }

    fn list_ledgers(&self, kind: LedgerKind) -> RepositoryResult<Vec<Ledger>> {
        Ok(self.list(kind)?)
    }
}

impl LedgerWriter for JsonLedgerStore {
    fn save_ledger(&self, ledger: &Ledger) -> RepositoryResult<Ledger> {
        Ok(self.upsert(ledger)?)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), LocalStoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn upsert_keeps_one_record_per_id_and_created_at() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonLedgerStore::new(dir.path());
        let created = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();

        let mut ledger = Ledger::new(LedgerKind::Quote, created);
        ledger.client_name = "First".into();
        store.save_ledger(&ledger).expect("first save");

        let mut resaved = ledger.clone();
        resaved.client_name = "Second".into();
        resaved.created_at = created + Duration::days(3);
        resaved.updated_at = created + Duration::days(3);
        let stored = store.save_ledger(&resaved).expect("second save");

        assert_eq!(stored.created_at, created);
        let all = store.list_ledgers(LedgerKind::Quote).expect("list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].client_name, "Second");
        assert!(store.list_ledgers(LedgerKind::Invoice).expect("list").is_empty());
    }

    #[test]
    fn legacy_file_without_kind_is_tagged_on_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonLedgerStore::new(dir.path());
        fs::write(
            store.path_for(LedgerKind::Invoice),
            r#"[{"id":"a1","clientName":"Legacy","fromAddress":"Deira","items":[],
                "taxPercent":5,"discount":0,
                "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}]"#,
        )
        .expect("write legacy file");

        let id = LedgerId::new("a1").expect("id");
        let ledger = store.get_ledger(&id).expect("read").expect("present");
        assert_eq!(ledger.kind, LedgerKind::Invoice);
        assert_eq!(ledger.origin_address, "Deira");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonLedgerStore::new(dir.path());
        fs::write(store.path_for(LedgerKind::Quote), "{not json").expect("write");

        assert!(store.list_ledgers(LedgerKind::Quote).is_err());
    }
}
