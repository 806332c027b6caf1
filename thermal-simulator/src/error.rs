//! Simulator errors.

use thermal_store::ReceiptId;
use thiserror::Error;

/// Errors that may occur when starting a simulated print.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulatorError {
    #[error("receipt not found: {0}")]
    ReceiptNotFound(ReceiptId),
}
