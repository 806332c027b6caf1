//! Core types for receipts and print jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

pub type ReceiptId = i64;
pub type PrintJobId = i64;

/// A single line on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl ReceiptItem {
    pub fn new(name: impl Into<String>, price: Money, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity: Some(quantity),
        }
    }

    /// Quantity, defaulting to one when unspecified.
    #[inline]
    pub fn quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    /// Price times quantity, `None` if it exceeds [`Money::MAX`].
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_times(self.quantity())
    }
}

/// Fields supplied when a receipt is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReceipt {
    pub store_name: String,
    pub order_number: String,
    pub customer: String,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    /// JSON-serialized list of [`ReceiptItem`]s.
    pub items: String,
}

/// A stored receipt. Immutable apart from `printed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: ReceiptId,
    pub store_name: String,
    pub order_number: String,
    pub customer: String,
    pub date: DateTime<Utc>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    pub items: String,
    pub printed: bool,
}

impl Receipt {
    /// Decode the serialized line items.
    pub fn parsed_items(&self) -> Result<Vec<ReceiptItem>, serde_json::Error> {
        serde_json::from_str(&self.items)
    }
}

/// Status of a print job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrintJobStatus {
    #[default]
    Pending,
    Printing,
    Completed,
    Failed,
}

impl PrintJobStatus {
    /// Returns true if this status represents a terminal state.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for PrintJobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Printing => "printing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        })
    }
}

/// Request to create a print job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPrintJob {
    pub receipt_id: Option<ReceiptId>,
    pub status: PrintJobStatus,
}

impl NewPrintJob {
    #[inline]
    pub fn for_receipt(receipt_id: ReceiptId) -> Self {
        Self {
            receipt_id: Some(receipt_id),
            status: PrintJobStatus::Pending,
        }
    }

    /// A connectivity check with no receipt attached.
    #[inline]
    pub fn test_print() -> Self {
        Self::default()
    }
}

/// A record of a (simulated) print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJob {
    pub id: PrintJobId,
    pub receipt_id: Option<ReceiptId>,
    pub status: PrintJobStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl PrintJob {
    #[inline]
    pub fn is_test_print(&self) -> bool {
        self.receipt_id.is_none()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Terminal verdict applied to a pending job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOutcome {
    Completed,
    Failed { message: String },
}

impl PrintOutcome {
    #[inline]
    pub fn status(&self) -> PrintJobStatus {
        match self {
            Self::Completed => PrintJobStatus::Completed,
            Self::Failed { .. } => PrintJobStatus::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn print_job_serializes_camel_case() {
        let job = PrintJob {
            id: 3,
            receipt_id: None,
            status: PrintJobStatus::Pending,
            created_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            completed_at: None,
            error_message: None,
        };
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["receiptId"], serde_json::Value::Null);
        assert_eq!(value["completedAt"], serde_json::Value::Null);
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn item_quantity_defaults_to_one() {
        let item: ReceiptItem =
            serde_json::from_value(json!({ "name": "Coffee", "price": 2.0 })).unwrap();
        assert_eq!(item.quantity(), 1);
        assert_eq!(item.line_total(), Some(Money::from_cents(200)));

        let item: ReceiptItem =
            serde_json::from_value(json!({ "name": "Bagel", "price": 1.25, "quantity": 3 }))
                .unwrap();
        assert_eq!(item.line_total(), Some(Money::from_cents(375)));
    }

    #[test]
    fn receipt_items_decode_from_stored_json() {
        let mut receipt = Receipt {
            id: 1,
            store_name: "Test".into(),
            order_number: "#1".into(),
            customer: "A".into(),
            date: Utc::now(),
            subtotal: Money::from_cents(450),
            tax: Money::from_cents(36),
            total: Money::from_cents(486),
            items: r#"[{"name":"Coffee","price":2.0},{"name":"Bagel","price":"1.25","quantity":2}]"#
                .into(),
            printed: false,
        };
        let items = receipt.parsed_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], ReceiptItem::new("Bagel", Money::from_cents(125), 2));

        receipt.items = "not json".into();
        assert!(receipt.parsed_items().is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!PrintJobStatus::Pending.is_terminal());
        assert!(!PrintJobStatus::Printing.is_terminal());
        assert!(PrintJobStatus::Completed.is_terminal());
        assert!(PrintJobStatus::Failed.is_terminal());
    }
}
