//! Line-item ledgers behind invoices and quotes.
//!
//! A ledger is a flat mutable record: an ordered list of [`LineItem`]s plus a
//! tax percentage and a flat discount. Totals are always derived from the
//! current fields through [`Ledger::totals`] and never stored.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::types::{LedgerId, LineItemId, TypeConstraintError};

/// Tax percentage pre-filled on a fresh ledger.
pub const DEFAULT_TAX_PERCENT: &str = "5";

/// Numeric field exactly as the user typed it.
///
/// The raw text is kept for display and persistence; arithmetic goes through
/// [`NumericInput::value`], which yields `None` for anything that is not a
/// finite number.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NumericInput(String);

impl NumericInput {
    pub fn new<S: Into<String>>(raw: S) -> Self {
        Self(raw.into())
    }

    pub fn from_number(value: f64) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parsed value, `None` when blank or not a finite number.
    pub fn value(&self) -> Option<f64> {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
    }

    /// Parsed value with malformed input coerced to zero.
    pub fn value_or_zero(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

impl Display for NumericInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        Self::from_number(value)
    }
}

impl Serialize for NumericInput {
    // Written as a JSON number only when that number reads back as the same text.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value() {
            Some(value) if value.to_string() == self.0 => serializer.serialize_f64(value),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

struct NumericInputVisitor;

impl Visitor<'_> for NumericInputVisitor {
    type Value = NumericInput;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(NumericInput(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(NumericInput(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(NumericInput::from_number(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(NumericInput::new(value))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(NumericInput(value))
    }
}

impl<'de> Deserialize<'de> for NumericInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericInputVisitor)
    }
}

/// Which document a ledger produces. Only the print template and the
/// persistence target depend on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    Invoice,
    #[default]
    Quote,
}

impl LedgerKind {
    pub const ALL: [LedgerKind; 2] = [LedgerKind::Invoice, LedgerKind::Quote];

    pub fn as_str(self) -> &'static str {
        match self {
            LedgerKind::Invoice => "invoice",
            LedgerKind::Quote => "quote",
        }
    }

    /// Path segment used by the admin console (`/admin/invoices`).
    pub fn plural(self) -> &'static str {
        match self {
            LedgerKind::Invoice => "invoices",
            LedgerKind::Quote => "quotes",
        }
    }

    /// Heading printed at the top of the document.
    pub fn document_title(self) -> &'static str {
        match self {
            LedgerKind::Invoice => "INVOICE",
            LedgerKind::Quote => "QUOTE",
        }
    }

    pub fn from_plural(value: &str) -> Option<Self> {
        LedgerKind::ALL
            .into_iter()
            .find(|kind| kind.plural() == value)
    }
}

impl Display for LedgerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invoice" => Ok(LedgerKind::Invoice),
            "quote" => Ok(LedgerKind::Quote),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown ledger kind `{other}`"
            ))),
        }
    }
}

/// One billable row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: LineItemId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<NumericInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<NumericInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<NumericInput>,
}

/// Partial update for a [`LineItem`]; `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<NumericInput>,
    pub unit_price: Option<NumericInput>,
    pub amount: Option<NumericInput>,
}

impl LineItem {
    /// A blank row in the shape the given document uses: quantity × unit
    /// price for invoices, a flat amount for quotes.
    pub fn blank(kind: LedgerKind) -> Self {
        let (quantity, unit_price, amount): (
            Option<NumericInput>,
            Option<NumericInput>,
            Option<NumericInput>,
        ) = match kind {
            LedgerKind::Invoice => (Some("1".into()), Some("0".into()), None),
            LedgerKind::Quote => (None, None, Some("0".into())),
        };
        Self {
            id: LineItemId::generate(),
            title: String::new(),
            description: String::new(),
            quantity,
            unit_price,
            amount,
        }
    }

    /// The item's share of the subtotal. Never negative.
    pub fn contribution(&self) -> f64 {
        let quantity = self.quantity.as_ref().and_then(NumericInput::value);
        let unit_price = self.unit_price.as_ref().and_then(NumericInput::value);

        let value = match (quantity, unit_price) {
            (Some(quantity), Some(unit_price)) => quantity * unit_price,
            _ => self
                .amount
                .as_ref()
                .map(NumericInput::value_or_zero)
                .unwrap_or(0.0),
        };

        non_negative(value)
    }

    pub fn apply(&mut self, patch: LineItemPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = Some(quantity);
        }
        if let Some(unit_price) = patch.unit_price {
            self.unit_price = Some(unit_price);
        }
        if let Some(amount) = patch.amount {
            self.amount = Some(amount);
        }
    }
}

/// Figures derived from a ledger.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LedgerTotals {
    pub subtotal: f64,
    pub tax_percent: f64,
    pub tax_amount: f64,
    pub discount: f64,
    pub total: f64,
}

/// Invoice or quote document under construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    pub id: LedgerId,
    #[serde(default)]
    pub kind: LedgerKind,
    #[serde(default)]
    pub client_name: String,
    #[serde(default, alias = "fromAddress")]
    pub origin_address: String,
    #[serde(default, alias = "toAddress")]
    pub destination_address: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub tax_percent: NumericInput,
    #[serde(default)]
    pub discount: NumericInput,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ledger {
    /// Fresh ledger with one blank item and the default tax rate.
    pub fn new(kind: LedgerKind, now: DateTime<Utc>) -> Self {
        let (invoice_number, issue_date) = match kind {
            LedgerKind::Invoice => (
                Some(default_invoice_number(now)),
                Some(now.date_naive()),
            ),
            LedgerKind::Quote => (None, None),
        };

        Self {
            id: LedgerId::generate(),
            kind,
            client_name: String::new(),
            origin_address: String::new(),
            destination_address: String::new(),
            notes: String::new(),
            invoice_number,
            issue_date,
            professional: None,
            items: vec![LineItem::blank(kind)],
            tax_percent: NumericInput::new(DEFAULT_TAX_PERCENT),
            discount: NumericInput::new("0"),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a blank item and returns its id.
    pub fn add_item(&mut self) -> LineItemId {
        let item = LineItem::blank(self.kind);
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    /// Drops the item with the given id; unknown ids are ignored.
    pub fn remove_item(&mut self, id: &LineItemId) {
        self.items.retain(|item| &item.id != id);
    }

    /// Merges `patch` into the matching item. Returns `false` when no item
    /// has that id, in which case nothing changes.
    pub fn update_item(&mut self, id: &LineItemId, patch: LineItemPatch) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn subtotal(&self) -> f64 {
        non_negative(self.items.iter().map(LineItem::contribution).sum())
    }

    pub fn totals(&self) -> LedgerTotals {
        let subtotal = self.subtotal();
        let tax_percent = self.tax_percent.value_or_zero();
        let tax_amount = non_negative(subtotal * tax_percent / 100.0);
        let discount = self.discount.value_or_zero();
        let total = non_negative(subtotal + tax_amount - discount);

        LedgerTotals {
            subtotal,
            tax_percent,
            tax_amount,
            discount,
            total,
        }
    }

    /// Marks the ledger as modified at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Zero for negative, NaN and overflowed values.
fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// `INV-` followed by the last six digits of the epoch milliseconds.
pub fn default_invoice_number(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().to_string();
    let tail = &millis[millis.len().saturating_sub(6)..];
    format!("INV-{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    fn item(quantity: Option<&str>, unit_price: Option<&str>, amount: Option<&str>) -> LineItem {
        LineItem {
            id: LineItemId::generate(),
            title: String::new(),
            description: String::new(),
            quantity: quantity.map(NumericInput::from),
            unit_price: unit_price.map(NumericInput::from),
            amount: amount.map(NumericInput::from),
        }
    }

    fn ledger_with(items: Vec<LineItem>, tax: &str, discount: &str) -> Ledger {
        let mut ledger = Ledger::new(LedgerKind::Quote, now());
        ledger.items = items;
        ledger.tax_percent = tax.into();
        ledger.discount = discount.into();
        ledger
    }

    #[test]
    fn quantity_times_unit_price() {
        assert_eq!(item(Some("2"), Some("50"), None).contribution(), 100.0);
    }

    #[test]
    fn negative_product_is_clamped() {
        assert_eq!(item(Some("3"), Some("-10"), None).contribution(), 0.0);
    }

    #[test]
    fn overflowing_product_counts_as_zero() {
        assert_eq!(item(Some("1e200"), Some("1e200"), None).contribution(), 0.0);

        let ledger = ledger_with(
            vec![item(None, None, Some("1e308")), item(None, None, Some("1e308"))],
            "1e308",
            "0",
        );
        let totals = ledger.totals();
        assert!(totals.subtotal.is_finite());
        assert!(totals.tax_amount.is_finite());
        assert!(totals.total.is_finite());
    }

    #[test]
    fn falls_back_to_amount_without_a_valid_pair() {
        assert_eq!(item(None, None, Some("30")).contribution(), 30.0);
        assert_eq!(item(Some("2"), Some("abc"), Some("12.5")).contribution(), 12.5);
        assert_eq!(item(Some("2"), None, Some("nope")).contribution(), 0.0);
        assert_eq!(item(None, None, None).contribution(), 0.0);
        assert_eq!(item(None, None, Some("-4")).contribution(), 0.0);
    }

    #[test]
    fn mixed_items_with_tax_and_discount() {
        let ledger = ledger_with(
            vec![item(Some("2"), Some("50"), None), item(None, None, Some("30"))],
            "10",
            "5",
        );
        let totals = ledger.totals();
        assert_eq!(totals.subtotal, 130.0);
        assert_eq!(totals.tax_amount, 13.0);
        assert_eq!(totals.total, 138.0);
    }

    #[test]
    fn empty_ledger_totals_zero() {
        let totals = ledger_with(Vec::new(), "0", "0").totals();
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn discount_never_drives_total_negative() {
        let ledger = ledger_with(vec![item(None, None, Some("10"))], "0", "50");
        assert_eq!(ledger.totals().total, 0.0);
    }

    #[test]
    fn subtotal_ignores_item_order() {
        let items = vec![
            item(Some("1.5"), Some("20"), None),
            item(None, None, Some("7.25")),
            item(Some("4"), Some("0.5"), None),
        ];
        let forward = ledger_with(items.clone(), "0", "0").subtotal();
        let mut reversed_items = items;
        reversed_items.reverse();
        let reversed = ledger_with(reversed_items, "0", "0").subtotal();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn malformed_tax_and_discount_count_as_zero() {
        let ledger = ledger_with(vec![item(None, None, Some("100"))], "ten", "");
        let totals = ledger.totals();
        assert_eq!(totals.tax_amount, 0.0);
        assert_eq!(totals.total, 100.0);
        assert_eq!(ledger.tax_percent.as_str(), "ten");
    }

    #[test]
    fn new_ledger_has_one_blank_item() {
        let invoice = Ledger::new(LedgerKind::Invoice, now());
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].quantity, Some("1".into()));
        assert_eq!(invoice.items[0].unit_price, Some("0".into()));
        assert_eq!(invoice.issue_date, Some(now().date_naive()));
        assert!(
            invoice
                .invoice_number
                .as_deref()
                .is_some_and(|n| n.starts_with("INV-") && n.len() == 10)
        );

        let quote = Ledger::new(LedgerKind::Quote, now());
        assert_eq!(quote.items[0].amount, Some("0".into()));
        assert!(quote.invoice_number.is_none());
    }

    #[test]
    fn add_remove_and_update_items() {
        let mut ledger = Ledger::new(LedgerKind::Invoice, now());
        let id = ledger.add_item();
        assert_eq!(ledger.items.len(), 2);

        let updated = ledger.update_item(
            &id,
            LineItemPatch {
                title: Some("Packing".to_string()),
                quantity: Some("3".into()),
                unit_price: Some("40".into()),
                ..LineItemPatch::default()
            },
        );
        assert!(updated);
        assert_eq!(ledger.subtotal(), 120.0);

        let missing = LineItemId::new("missing").unwrap();
        assert!(!ledger.update_item(&missing, LineItemPatch::default()));
        ledger.remove_item(&missing);
        assert_eq!(ledger.items.len(), 2);

        ledger.remove_item(&id);
        assert_eq!(ledger.items.len(), 1);
        assert_eq!(ledger.subtotal(), 0.0);
    }

    #[test]
    fn numeric_input_keeps_entered_text() {
        let ledger = ledger_with(vec![item(Some("2.50"), Some("4"), None)], "5", "1e1");
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json["items"][0]["quantity"], "2.50");
        assert_eq!(json["items"][0]["unitPrice"], 4.0);
        assert_eq!(json["discount"], "1e1");

        let back: Ledger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn legacy_invoice_addresses_are_accepted() {
        let json = serde_json::json!({
            "id": "abc123",
            "kind": "invoice",
            "clientName": "Jane",
            "fromAddress": "Dubai",
            "toAddress": "Sharjah",
            "items": [{ "id": "i1", "title": "Truck", "description": "", "amount": 300 }],
            "taxPercent": 5,
            "discount": 0,
            "createdAt": "2025-03-14T09:26:53Z",
            "updatedAt": "2025-03-14T09:26:53Z"
        });
        let ledger: Ledger = serde_json::from_value(json).unwrap();
        assert_eq!(ledger.origin_address, "Dubai");
        assert_eq!(ledger.destination_address, "Sharjah");
        assert_eq!(ledger.totals().total, 315.0);
    }
}
