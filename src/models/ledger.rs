//! Diesel models for ledgers and their line items.
//!
//! Numeric fields are stored as the text the user typed so a saved ledger
//! reloads exactly as it was entered.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::ledger::{Ledger as DomainLedger, LedgerKind, LineItem, NumericInput};
use crate::domain::types::{LedgerId, LineItemId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::ledgers)]
/// Header row of a [`crate::domain::ledger::Ledger`].
pub struct Ledger {
    pub id: String,
    pub kind: String,
    pub client_name: String,
    pub origin_address: String,
    pub destination_address: String,
    pub notes: String,
    pub document_number: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub professional: Option<String>,
    pub tax_percent: String,
    pub discount: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Insertable, Associations)]
#[diesel(table_name = crate::schema::ledger_items)]
#[diesel(primary_key(ledger_id, id))]
#[diesel(belongs_to(Ledger, foreign_key = ledger_id))]
/// One row of `ledger_items`; `position` preserves display order.
pub struct LedgerItem {
    pub id: String,
    pub ledger_id: String,
    pub position: i32,
    pub title: String,
    pub description: String,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
    pub amount: Option<String>,
}

impl From<&DomainLedger> for Ledger {
    fn from(ledger: &DomainLedger) -> Self {
        Self {
            id: ledger.id.to_string(),
            kind: ledger.kind.as_str().to_string(),
            client_name: ledger.client_name.clone(),
            origin_address: ledger.origin_address.clone(),
            destination_address: ledger.destination_address.clone(),
            notes: ledger.notes.clone(),
            document_number: ledger.invoice_number.clone(),
            issue_date: ledger.issue_date,
            professional: ledger.professional.clone(),
            tax_percent: ledger.tax_percent.as_str().to_string(),
            discount: ledger.discount.as_str().to_string(),
            created_at: ledger.created_at.naive_utc(),
            updated_at: ledger.updated_at.naive_utc(),
        }
    }
}

impl LedgerItem {
    pub fn from_domain(ledger_id: &LedgerId, position: usize, item: &LineItem) -> Self {
        Self {
            id: item.id.to_string(),
            ledger_id: ledger_id.to_string(),
            position: i32::try_from(position).unwrap_or(i32::MAX),
            title: item.title.clone(),
            description: item.description.clone(),
            quantity: item.quantity.as_ref().map(|value| value.as_str().to_string()),
            unit_price: item
                .unit_price
                .as_ref()
                .map(|value| value.as_str().to_string()),
            amount: item.amount.as_ref().map(|value| value.as_str().to_string()),
        }
    }
}

impl TryFrom<LedgerItem> for LineItem {
    type Error = TypeConstraintError;

    fn try_from(item: LedgerItem) -> Result<Self, Self::Error> {
        Ok(Self {
            id: LineItemId::new(item.id)?,
            title: item.title,
            description: item.description,
            quantity: item.quantity.map(NumericInput::new),
            unit_price: item.unit_price.map(NumericInput::new),
            amount: item.amount.map(NumericInput::new),
        })
    }
}

impl Ledger {
    /// Assembles the domain ledger from its header and items ordered by position.
    pub fn into_domain(self, items: Vec<LedgerItem>) -> Result<DomainLedger, TypeConstraintError> {
        let items = items
            .into_iter()
            .map(LineItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DomainLedger {
            id: LedgerId::new(self.id)?,
            kind: self.kind.parse::<LedgerKind>()?,
            client_name: self.client_name,
            origin_address: self.origin_address,
            destination_address: self.destination_address,
            notes: self.notes,
            invoice_number: self.document_number,
            issue_date: self.issue_date,
            professional: self.professional,
            items,
            tax_percent: NumericInput::new(self.tax_percent),
            discount: NumericInput::new(self.discount),
            created_at: self.created_at.and_utc(),
            updated_at: self.updated_at.and_utc(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn ledger_survives_row_conversion() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let mut domain = DomainLedger::new(LedgerKind::Invoice, now);
        domain.client_name = "Acme".into();
        domain.items[0].quantity = Some("2".into());
        domain.items[0].unit_price = Some("abc".into());
        domain.discount = "".into();

        let header = Ledger::from(&domain);
        let items = domain
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| LedgerItem::from_domain(&domain.id, position, item))
            .collect::<Vec<_>>();
        assert_eq!(header.kind, "invoice");
        assert_eq!(items[0].unit_price.as_deref(), Some("abc"));

        let restored = header.into_domain(items).expect("valid ledger");
        assert_eq!(restored, domain);
    }
}
