//! Receipt drafts and their totals.

use chrono::NaiveDate;
use thermal_store::{Money, MoneyError, NewReceipt, ReceiptItem};
use thiserror::Error;

/// Sales tax in basis points (8%).
pub const TAX_RATE_BPS: i64 = 800;

/// A receipt being composed on the client, before it is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptDraft {
    pub store_name: String,
    pub order_number: String,
    pub customer: String,
    pub date: NaiveDate,
    pub items: Vec<ReceiptItem>,
}

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("receipt amounts exceed {}", Money::MAX)]
    TooLarge,
    #[error("could not encode receipt items: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl ReceiptDraft {
    /// The coffee shop order the printer page starts with.
    pub fn demo(date: NaiveDate) -> Self {
        Self {
            store_name: "Square Coffee Shop".to_string(),
            order_number: "#12345".to_string(),
            customer: "John Doe".to_string(),
            date,
            items: vec![
                ReceiptItem::new("Cappuccino (L)", Money::from_cents(450), 1),
                ReceiptItem::new("Blueberry Muffin", Money::from_cents(325), 1),
                ReceiptItem::new("Extra Shot", Money::from_cents(75), 1),
            ],
        }
    }

    /// Subtotal is the sum of line totals; tax is 8% of it rounded to the
    /// cent; total is their sum.
    /// Fails when any amount leaves the eight-integer-digit range the server
    /// accepts.
    pub fn totals(&self) -> Result<Totals, DraftError> {
        let lines = self
            .items
            .iter()
            .map(ReceiptItem::line_total)
            .collect::<Option<Vec<_>>>()
            .ok_or(DraftError::TooLarge)?;
        let subtotal = Money::checked_sum(lines).ok_or(DraftError::TooLarge)?;
        let tax = subtotal
            .percent_bps(TAX_RATE_BPS)
            .ok_or(DraftError::TooLarge)?;
        let total = subtotal.checked_add(tax).ok_or(DraftError::TooLarge)?;
        Ok(Totals {
            subtotal,
            tax,
            total,
        })
    }

    /// Body for `POST /receipts`.
    pub fn to_new_receipt(&self) -> Result<NewReceipt, DraftError> {
        let Totals {
            subtotal,
            tax,
            total,
        } = self.totals()?;
        Ok(NewReceipt {
            store_name: self.store_name.clone(),
            order_number: self.order_number.clone(),
            customer: self.customer.clone(),
            subtotal,
            tax,
            total,
            items: serde_json::to_string(&self.items)?,
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemArgError {
    #[error("expected name=price[xqty], got {0:?}")]
    Malformed(String),
    #[error("invalid price in {arg:?}: {source}")]
    Price {
        arg: String,
        #[source]
        source: MoneyError,
    },
    #[error("invalid quantity in {0:?}")]
    Quantity(String),
    #[error("line total of {0:?} exceeds {max}", max = Money::MAX)]
    TooLarge(String),
}

/// Parse a command-line line item such as `Latte=4.25` or `Bagel=2.50x3`.
pub fn parse_item_arg(arg: &str) -> Result<ReceiptItem, ItemArgError> {
    let (name, rest) = arg
        .rsplit_once('=')
        .ok_or_else(|| ItemArgError::Malformed(arg.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ItemArgError::Malformed(arg.to_string()));
    }

    let (price, quantity) = match rest.split_once(['x', 'X']) {
        Some((price, qty)) => {
            let qty = qty
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|q| *q > 0)
                .ok_or_else(|| ItemArgError::Quantity(arg.to_string()))?;
            (price, qty)
        }
        None => (rest, 1),
    };
    let price = price.parse::<Money>().map_err(|source| ItemArgError::Price {
        arg: arg.to_string(),
        source,
    })?;
    let item = ReceiptItem::new(name, price, quantity);
    if item.line_total().is_none() {
        return Err(ItemArgError::TooLarge(arg.to_string()));
    }
    Ok(item)
}
