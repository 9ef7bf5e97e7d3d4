//! Ledger list rows and the builder form model.

use serde::Serialize;

use crate::domain::ledger::{Ledger, LedgerKind, LineItem};
use crate::dto::DATETIME_FORMAT;
use crate::forms::ledger::item_shape;
use crate::render::{PrintableDocument, money};

#[derive(Debug, Clone, Serialize)]
pub struct LedgerRowView {
    pub id: String,
    pub number: String,
    pub client_name: String,
    pub total: String,
    pub item_count: usize,
    pub updated_at: String,
}

impl From<&Ledger> for LedgerRowView {
    fn from(ledger: &Ledger) -> Self {
        Self {
            id: ledger.id.to_string(),
            number: PrintableDocument::number_of(ledger),
            client_name: ledger.client_name.clone(),
            total: money(ledger.totals().total),
            item_count: ledger.items.len(),
            updated_at: ledger.updated_at.format(DATETIME_FORMAT).to_string(),
        }
    }
}

/// One editable row; numeric cells keep whatever the user typed.
#[derive(Debug, Clone, Serialize)]
pub struct ItemEditorView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub amount: String,
    /// Numeric fields the item carries, posted back as `item_shape`.
    pub shape: String,
    pub line_total: String,
}

impl From<&LineItem> for ItemEditorView {
    fn from(item: &LineItem) -> Self {
        let raw = |value: &Option<_>| {
            value
                .as_ref()
                .map(|input: &crate::domain::ledger::NumericInput| input.as_str().to_string())
                .unwrap_or_default()
        };
        Self {
            id: item.id.to_string(),
            title: item.title.clone(),
            description: item.description.clone(),
            quantity: raw(&item.quantity),
            unit_price: raw(&item.unit_price),
            amount: raw(&item.amount),
            shape: item_shape(item),
            line_total: money(item.contribution()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerEditorView {
    pub id: String,
    pub kind: &'static str,
    pub kinds: &'static str,
    pub title: &'static str,
    pub is_invoice: bool,
    pub client_name: String,
    pub origin_address: String,
    pub destination_address: String,
    pub notes: String,
    pub invoice_number: String,
    pub issue_date: String,
    pub professional: String,
    pub tax_percent: String,
    pub discount: String,
    pub items: Vec<ItemEditorView>,
    pub subtotal: String,
    pub tax_amount: String,
    pub total: String,
}

impl From<&Ledger> for LedgerEditorView {
    fn from(ledger: &Ledger) -> Self {
        let totals = ledger.totals();
        Self {
            id: ledger.id.to_string(),
            kind: ledger.kind.as_str(),
            kinds: ledger.kind.plural(),
            title: ledger.kind.document_title(),
            is_invoice: ledger.kind == LedgerKind::Invoice,
            client_name: ledger.client_name.clone(),
            origin_address: ledger.origin_address.clone(),
            destination_address: ledger.destination_address.clone(),
            notes: ledger.notes.clone(),
            invoice_number: ledger.invoice_number.clone().unwrap_or_default(),
            issue_date: ledger
                .issue_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            professional: ledger.professional.clone().unwrap_or_default(),
            tax_percent: ledger.tax_percent.as_str().to_string(),
            discount: ledger.discount.as_str().to_string(),
            items: ledger.items.iter().map(ItemEditorView::from).collect(),
            subtotal: money(totals.subtotal),
            tax_amount: money(totals.tax_amount),
            total: money(totals.total),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::ledger::NumericInput;

    #[test]
    fn editor_keeps_raw_numeric_text() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let mut ledger = Ledger::new(LedgerKind::Invoice, now);
        ledger.items[0].quantity = Some(NumericInput::new("two"));
        ledger.items[0].unit_price = Some(NumericInput::new("40"));

        let view = LedgerEditorView::from(&ledger);

        assert_eq!(view.items[0].quantity, "two");
        assert_eq!(view.items[0].shape, "quantity,unit_price");
        assert_eq!(view.items[0].line_total, "0.00");
        assert_eq!(view.issue_date, "2025-01-02");
        assert!(view.is_invoice);
    }
}
