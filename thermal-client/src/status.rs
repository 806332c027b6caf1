//! Print status as seen by the user.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::ClientError;

/// `ready -> printing -> {success, error}`. A new submission from any state
/// except `printing` starts over at `printing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintStatus {
    #[default]
    Ready,
    Printing,
    Success,
    Error,
}

impl PrintStatus {
    #[inline]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::Printing)
    }

    /// Status panel heading.
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Ready => "Ready to print",
            Self::Printing => "Printing...",
            Self::Success => "Print Successful",
            Self::Error => "Print Failed",
        }
    }

    /// Status panel hint line.
    pub const fn detail(self) -> &'static str {
        match self {
            Self::Ready => "Click the print button to start",
            Self::Printing => "Sending data to printer",
            Self::Success => "Receipt printed",
            Self::Error => "Check printer connection",
        }
    }
}

impl fmt::Display for PrintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ready => "ready",
            Self::Printing => "printing",
            Self::Success => "success",
            Self::Error => "error",
        })
    }
}

/// Publishes [`PrintStatus`] changes to any number of observers.
///
/// Clones share the same channel.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    tx: Arc<watch::Sender<PrintStatus>>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(PrintStatus::Ready);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> PrintStatus {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PrintStatus> {
        self.tx.subscribe()
    }

    /// Move to `printing`, refusing if a print is already running. The
    /// check and the transition happen under the channel's lock.
    pub fn begin(&self) -> Result<(), ClientError> {
        let started = self.tx.send_if_modified(|status| {
            if status.is_busy() {
                false
            } else {
                *status = PrintStatus::Printing;
                true
            }
        });
        if started {
            Ok(())
        } else {
            Err(ClientError::PrintInProgress)
        }
    }

    pub fn finish(&self, status: PrintStatus) {
        self.tx.send_replace(status);
    }
}
