//! Invoice and quote builder form.
//!
//! Line items arrive as parallel repeated fields (`item_id`, `item_title`,
//! ...), one entry per row, so the body is parsed with `serde_html_form`.
//! Every row posts all three numeric cells plus `item_shape`, the numeric
//! fields the item carried when the page was rendered. A cell counts when it
//! is listed in the shape or was filled in; numeric text is kept as typed.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::ledger::{Ledger, LedgerKind, LineItem, NumericInput};
use crate::domain::types::{LedgerId, LineItemId};
use crate::forms::{FormError, non_blank, parse_optional_date};

#[derive(Debug, Default, Deserialize)]
pub struct LedgerForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub origin_address: String,
    #[serde(default)]
    pub destination_address: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub issue_date: String,
    #[serde(default)]
    pub professional: String,
    #[serde(default)]
    pub tax_percent: String,
    #[serde(default)]
    pub discount: String,
    #[serde(default, rename = "item_id")]
    pub item_ids: Vec<String>,
    #[serde(default, rename = "item_title")]
    pub item_titles: Vec<String>,
    #[serde(default, rename = "item_description")]
    pub item_descriptions: Vec<String>,
    #[serde(default, rename = "item_quantity")]
    pub item_quantities: Vec<String>,
    #[serde(default, rename = "item_unit_price")]
    pub item_unit_prices: Vec<String>,
    #[serde(default, rename = "item_amount")]
    pub item_amounts: Vec<String>,
    /// Comma separated subset of `quantity,unit_price,amount` per row.
    #[serde(default, rename = "item_shape")]
    pub item_shapes: Vec<String>,
    /// Submit button pressed: `save`, `add_item` or `remove_item:<id>`.
    #[serde(default)]
    pub action: String,
}

/// What the builder asked for besides carrying the edited ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    Save,
    AddItem,
    RemoveItem(LineItemId),
}

#[derive(Debug)]
pub struct LedgerPayload {
    pub ledger: Ledger,
    pub command: LedgerCommand,
}

pub const SHAPE_QUANTITY: &str = "quantity";
pub const SHAPE_UNIT_PRICE: &str = "unit_price";
pub const SHAPE_AMOUNT: &str = "amount";

/// Numeric fields present on `item`, in the `item_shape` format.
pub fn item_shape(item: &LineItem) -> String {
    [
        (SHAPE_QUANTITY, item.quantity.is_some()),
        (SHAPE_UNIT_PRICE, item.unit_price.is_some()),
        (SHAPE_AMOUNT, item.amount.is_some()),
    ]
    .into_iter()
    .filter(|(_, present)| *present)
    .map(|(name, _)| name)
    .collect::<Vec<_>>()
    .join(",")
}

/// One numeric cell. Without a shape a posted column means the field is used.
fn column(
    values: &[String],
    index: usize,
    shape: Option<&str>,
    field: &str,
) -> Option<NumericInput> {
    let cell = values.get(index);
    let present = match shape {
        Some(shape) => {
            shape.split(',').any(|name| name.trim() == field)
                || cell.is_some_and(|raw| !raw.trim().is_empty())
        }
        None => !values.is_empty(),
    };
    present.then(|| NumericInput::new(cell.cloned().unwrap_or_default()))
}

fn text(values: &[String], index: usize) -> String {
    values.get(index).cloned().unwrap_or_default()
}

impl LedgerForm {
    /// Parses an urlencoded body with repeated item fields.
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|err| FormError::Malformed(err.to_string()))
    }

    fn command(&self) -> Result<LedgerCommand, FormError> {
        match self.action.trim() {
            "" | "save" => Ok(LedgerCommand::Save),
            "add_item" => Ok(LedgerCommand::AddItem),
            other => match other.strip_prefix("remove_item:") {
                Some(id) => LineItemId::new(id)
                    .map(LedgerCommand::RemoveItem)
                    .map_err(|_| FormError::InvalidId),
                None => Err(FormError::InvalidAction),
            },
        }
    }

    fn items(&self) -> Result<Vec<LineItem>, FormError> {
        let mut seen = HashSet::new();
        (0..self.item_ids.len())
            .map(|index| -> Result<LineItem, FormError> {
                let id = match non_blank(&self.item_ids[index]) {
                    Some(id) => LineItemId::new(id).map_err(|_| FormError::InvalidId)?,
                    None => LineItemId::generate(),
                };
                // Ids repeated within one document get a fresh one.
                let id = if seen.insert(id.clone()) {
                    id
                } else {
                    let fresh = LineItemId::generate();
                    seen.insert(fresh.clone());
                    fresh
                };
                let shape = self.item_shapes.get(index).map(String::as_str);
                Ok(LineItem {
                    id,
                    title: text(&self.item_titles, index),
                    description: text(&self.item_descriptions, index),
                    quantity: column(&self.item_quantities, index, shape, SHAPE_QUANTITY),
                    unit_price: column(&self.item_unit_prices, index, shape, SHAPE_UNIT_PRICE),
                    amount: column(&self.item_amounts, index, shape, SHAPE_AMOUNT),
                })
            })
            .collect()
    }

    /// Builds the edited ledger. `now` becomes both timestamps; the store
    /// keeps the original creation time when the id already exists.
    pub fn into_payload(
        self,
        kind: LedgerKind,
        now: DateTime<Utc>,
    ) -> Result<LedgerPayload, FormError> {
        let command = self.command()?;
        let items = self.items()?;

        let id = match non_blank(&self.id) {
            Some(id) => LedgerId::new(id).map_err(|_| FormError::InvalidId)?,
            None => LedgerId::generate(),
        };

        let mut ledger = Ledger::new(kind, now);
        ledger.id = id;
        ledger.client_name = self.client_name.trim().to_string();
        ledger.origin_address = self.origin_address.trim().to_string();
        ledger.destination_address = self.destination_address.trim().to_string();
        ledger.notes = self.notes.trim().to_string();
        ledger.items = items;
        ledger.tax_percent = NumericInput::new(self.tax_percent);
        ledger.discount = NumericInput::new(self.discount);

        match kind {
            LedgerKind::Invoice => {
                ledger.invoice_number = non_blank(&self.invoice_number);
                ledger.issue_date = parse_optional_date(&self.issue_date)?;
                ledger.professional = non_blank(&self.professional);
            }
            LedgerKind::Quote => {
                ledger.invoice_number = None;
                ledger.issue_date = None;
                ledger.professional = None;
            }
        }

        if command == LedgerCommand::Save && ledger.client_name.is_empty() {
            return Err(FormError::MissingClientName);
        }

        Ok(LedgerPayload { ledger, command })
    }
}
