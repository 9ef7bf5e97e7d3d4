use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::ledger::{Ledger, LedgerKind};
use crate::domain::types::LedgerId;
use crate::models::ledger::{Ledger as DbLedger, LedgerItem as DbLedgerItem};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, LedgerReader, LedgerWriter};

impl LedgerReader for DieselRepository {
    fn get_ledger(&self, id: &LedgerId) -> RepositoryResult<Option<Ledger>> {
        use crate::schema::{ledger_items, ledgers};

        let mut conn = self.conn()?;
        let Some(header) = ledgers::table
            .find(id.as_str())
            .first::<DbLedger>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let items = DbLedgerItem::belonging_to(&header)
            .order(ledger_items::position.asc())
            .load::<DbLedgerItem>(&mut conn)?;

        Ok(Some(header.into_domain(items)?))
    }

    fn list_ledgers(&self, kind: LedgerKind) -> RepositoryResult<Vec<Ledger>> {
        use crate::schema::{ledger_items, ledgers};

        let mut conn = self.conn()?;
        let headers = ledgers::table
            .filter(ledgers::kind.eq(kind.as_str()))
            .order(ledgers::updated_at.desc())
            .load::<DbLedger>(&mut conn)?;

        let items = DbLedgerItem::belonging_to(&headers)
            .order(ledger_items::position.asc())
            .load::<DbLedgerItem>(&mut conn)?
            .grouped_by(&headers);

        headers
            .into_iter()
            .zip(items)
            .map(|(header, items)| -> RepositoryResult<Ledger> { Ok(header.into_domain(items)?) })
            .collect()
    }
}

impl LedgerWriter for DieselRepository {
    fn save_ledger(&self, ledger: &Ledger) -> RepositoryResult<Ledger> {
        use crate::schema::{ledger_items, ledgers};

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let mut header = DbLedger::from(ledger);

            let stored_created_at = ledgers::table
                .find(&header.id)
                .select(ledgers::created_at)
                .first::<NaiveDateTime>(conn)
                .optional()?;
            if let Some(created_at) = stored_created_at {
                header.created_at = created_at;
            }

            diesel::insert_into(ledgers::table)
                .values(&header)
                .on_conflict(ledgers::id)
                .do_update()
                .set(&header)
                .execute(conn)?;

            diesel::delete(ledger_items::table.filter(ledger_items::ledger_id.eq(&header.id)))
                .execute(conn)?;

            let items = ledger
                .items
                .iter()
                .enumerate()
                .map(|(position, item)| DbLedgerItem::from_domain(&ledger.id, position, item))
                .collect::<Vec<_>>();

            if !items.is_empty() {
                diesel::insert_into(ledger_items::table)
                    .values(&items)
                    .execute(conn)?;
            }

            Ok(header.into_domain(items)?)
        })
    }
}
