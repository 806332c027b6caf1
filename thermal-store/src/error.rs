//! Error types for the receipt and print job store.

use thiserror::Error;

use crate::types::{PrintJobId, PrintJobStatus, ReceiptId};

/// Errors that may occur while reading or mutating the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("receipt not found: {0}")]
    ReceiptNotFound(ReceiptId),

    #[error("print job not found: {0}")]
    PrintJobNotFound(PrintJobId),

    #[error("print job {id} is already {status}")]
    TerminalState {
        id: PrintJobId,
        status: PrintJobStatus,
    },
}
