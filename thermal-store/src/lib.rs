//! Receipt and print job storage for the thermal printer simulator.
//!
//! Everything lives in memory for the lifetime of the process. The store is an
//! explicitly constructed handle rather than a global, so each server (and each
//! test) owns its own instance.
//!
//! # Architecture
//!
//! - [`PrintStore`] - Registry of receipts and print jobs with sequential ids
//! - [`Receipt`] / [`PrintJob`] - Stored records, serialized in camelCase
//! - [`Money`] - Fixed-point amounts kept as integer cents
//! - [`Clock`] - Time source for record timestamps
//!
//! # Example
//!
//! ```rust,no_run
//! use thermal_store::{Money, NewPrintJob, NewReceipt, PrintOutcome, PrintStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = PrintStore::new();
//!     let receipt = store
//!         .create_receipt(NewReceipt {
//!             store_name: "Test".into(),
//!             order_number: "#1".into(),
//!             customer: "A".into(),
//!             subtotal: Money::from_cents(200),
//!             tax: Money::from_cents(16),
//!             total: Money::from_cents(216),
//!             items: "[]".into(),
//!         })
//!         .await;
//!
//!     let job = store.create_job(NewPrintJob::for_receipt(receipt.id)).await;
//!     store.apply_outcome(job.id, &PrintOutcome::Completed).await.unwrap();
//!     assert!(store.get_receipt(receipt.id).await.unwrap().printed);
//! }
//! ```

mod clock;
mod error;
mod money;
mod store;
mod types;

pub use clock::{Clock, SystemClock};
pub use error::StoreError;
pub use money::{Money, MoneyError};
pub use store::PrintStore;
pub use types::{
    NewPrintJob, NewReceipt, PrintJob, PrintJobId, PrintJobStatus, PrintOutcome, Receipt,
    ReceiptId, ReceiptItem,
};
