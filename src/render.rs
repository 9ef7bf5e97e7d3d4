//! Printable invoice and quote documents.
//!
//! The template is compiled into the binary so printing works regardless of
//! the configured templates directory.

use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::ledger::{Ledger, LedgerKind, LineItem, NumericInput};

const PRINT_TEMPLATE_NAME: &str = "print/ledger.html";
const PRINT_TEMPLATE: &str = include_str!("../templates/print/ledger.html");

/// Shown wherever a text field is blank.
pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PrintableItem {
    pub title: String,
    pub description: String,
    pub quantity: String,
    pub unit_price: String,
    pub total: String,
}

/// Ledger flattened into display strings.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PrintableDocument {
    pub title: &'static str,
    pub number: String,
    pub date: String,
    pub client_name: String,
    pub origin_address: String,
    pub destination_address: String,
    pub professional: String,
    pub notes: String,
    pub items: Vec<PrintableItem>,
    pub subtotal: String,
    pub tax_percent: String,
    pub tax_amount: String,
    pub discount: String,
    pub total: String,
}

fn or_placeholder(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn numeric_or_placeholder(value: Option<&NumericInput>, format: fn(f64) -> String) -> String {
    value
        .and_then(NumericInput::value)
        .map(format)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

impl From<&LineItem> for PrintableItem {
    fn from(item: &LineItem) -> Self {
        Self {
            title: or_placeholder(&item.title),
            description: item.description.trim().to_string(),
            quantity: numeric_or_placeholder(item.quantity.as_ref(), quantity),
            unit_price: numeric_or_placeholder(item.unit_price.as_ref(), money),
            total: money(item.contribution()),
        }
    }
}

impl PrintableDocument {
    /// Invoice number, or `Q-` and the first id characters for quotes.
    pub fn number_of(ledger: &Ledger) -> String {
        let number = match ledger.kind {
            LedgerKind::Invoice => ledger.invoice_number.as_deref().unwrap_or_default(),
            LedgerKind::Quote => ledger.id.as_str().get(..8).unwrap_or(ledger.id.as_str()),
        };
        match ledger.kind {
            LedgerKind::Quote if !number.is_empty() => format!("Q-{}", number.to_uppercase()),
            _ => or_placeholder(number),
        }
    }
}

impl From<&Ledger> for PrintableDocument {
    fn from(ledger: &Ledger) -> Self {
        let totals = ledger.totals();
        let number = Self::number_of(ledger);

        let date = ledger
            .issue_date
            .unwrap_or_else(|| ledger.created_at.date_naive())
            .format("%d %b %Y")
            .to_string();

        Self {
            title: ledger.kind.document_title(),
            number,
            date,
            client_name: or_placeholder(&ledger.client_name),
            origin_address: or_placeholder(&ledger.origin_address),
            destination_address: or_placeholder(&ledger.destination_address),
            professional: or_placeholder(ledger.professional.as_deref().unwrap_or_default()),
            notes: or_placeholder(&ledger.notes),
            items: ledger.items.iter().map(PrintableItem::from).collect(),
            subtotal: money(totals.subtotal),
            tax_percent: quantity(totals.tax_percent),
            tax_amount: money(totals.tax_amount),
            discount: money(totals.discount),
            total: money(totals.total),
        }
    }
}

/// Renders ledgers into standalone HTML pages.
#[derive(Clone)]
pub struct PrintRenderer {
    tera: Tera,
}

impl PrintRenderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(PRINT_TEMPLATE_NAME, PRINT_TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn render(&self, ledger: &Ledger) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("doc", &PrintableDocument::from(ledger));
        self.tera.render(PRINT_TEMPLATE_NAME, &context)
    }
}
