//! Client side of the thermal printer simulator.
//!
//! # Architecture
//!
//! - [`PrinterApi`] - Transport seam; [`HttpPrinterApi`] talks to the server
//! - [`ReceiptDraft`] - Receipt being composed, with 8% tax totals
//! - [`StatusBoard`] - Publishes the `ready/printing/success/error` status
//! - [`JobPoller`] - Follows one print job until it finishes
//! - [`PrintController`] - Submit, print and poll, ending in a [`Notice`]
//! - [`preview`] / [`queue`] - Text renderings of the receipt and print queue

pub mod api;
pub mod controller;
pub mod draft;
pub mod error;
pub mod poller;
pub mod preview;
pub mod queue;
pub mod status;

#[cfg(test)]
mod testing;

pub use api::{HttpPrinterApi, PrinterApi, TestPrintStarted};
pub use controller::{Notice, PrintController, PrintReport};
pub use draft::{parse_item_arg, DraftError, ItemArgError, ReceiptDraft, Totals, TAX_RATE_BPS};
pub use error::ClientError;
pub use poller::{JobPoller, PollOutcome};
pub use status::{PrintStatus, StatusBoard};
