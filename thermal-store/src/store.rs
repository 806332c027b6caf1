//! In-memory receipt and print job store.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::types::{
    NewPrintJob, NewReceipt, PrintJob, PrintJobId, PrintJobStatus, PrintOutcome, Receipt,
    ReceiptId,
};

/// Internal storage. Ids are handed out in increasing order, so iterating the
/// maps yields insertion order.
#[derive(Debug, Default)]
struct StoreState {
    receipts: BTreeMap<ReceiptId, Receipt>,
    jobs: BTreeMap<PrintJobId, PrintJob>,
    last_receipt_id: ReceiptId,
    last_job_id: PrintJobId,
}

impl StoreState {
    #[inline]
    fn next_receipt_id(&mut self) -> ReceiptId {
        self.last_receipt_id += 1;
        self.last_receipt_id
    }

    #[inline]
    fn next_job_id(&mut self) -> PrintJobId {
        self.last_job_id += 1;
        self.last_job_id
    }

    /// Look up a job that is still allowed to change state.
    fn open_job_mut(&mut self, id: PrintJobId) -> Result<&mut PrintJob, StoreError> {
        let job = self
            .jobs
            .get_mut(&id)
            .ok_or(StoreError::PrintJobNotFound(id))?;
        if job.status.is_terminal() {
            return Err(StoreError::TerminalState {
                id,
                status: job.status,
            });
        }
        Ok(job)
    }
}

/// Registry of receipts and print jobs for the lifetime of the process.
///
/// Cloning is cheap and every clone shares the same state. Each operation
/// takes the lock once, so operations never interleave.
#[derive(Clone)]
pub struct PrintStore {
    state: Arc<RwLock<StoreState>>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for PrintStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintStore")
            .field("state", &"<RwLock<StoreState>>")
            .field("clock", &"<dyn Clock>")
            .finish()
    }
}

impl Default for PrintStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PrintStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Build a store that stamps records using the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            clock,
        }
    }

    /// Persist a receipt, assigning its id and creation date.
    pub async fn create_receipt(&self, new: NewReceipt) -> Receipt {
        let date = self.clock.now();
        let mut state = self.state.write().await;
        let id = state.next_receipt_id();
        let receipt = Receipt {
            id,
            store_name: new.store_name,
            order_number: new.order_number,
            customer: new.customer,
            date,
            subtotal: new.subtotal,
            tax: new.tax,
            total: new.total,
            items: new.items,
            printed: false,
        };
        state.receipts.insert(id, receipt.clone());
        debug!(receipt_id = id, "receipt stored");
        receipt
    }

    pub async fn get_receipt(&self, id: ReceiptId) -> Option<Receipt> {
        let state = self.state.read().await;
        state.receipts.get(&id).cloned()
    }

    pub async fn list_receipts(&self) -> Vec<Receipt> {
        let state = self.state.read().await;
        state.receipts.values().cloned().collect()
    }

    pub async fn set_receipt_printed(
        &self,
        id: ReceiptId,
        printed: bool,
    ) -> Result<Receipt, StoreError> {
        let mut state = self.state.write().await;
        let receipt = state
            .receipts
            .get_mut(&id)
            .ok_or(StoreError::ReceiptNotFound(id))?;
        receipt.printed = printed;
        Ok(receipt.clone())
    }

    /// Create a print job. A job created directly in a terminal status is
    /// stamped as completed at creation time.
    pub async fn create_job(&self, new: NewPrintJob) -> PrintJob {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        let id = state.next_job_id();
        let job = PrintJob {
            id,
            receipt_id: new.receipt_id,
            status: new.status,
            created_at: now,
            completed_at: new.status.is_terminal().then_some(now),
            error_message: None,
        };
        state.jobs.insert(id, job.clone());
        debug!(
            job_id = id,
            receipt_id = ?new.receipt_id,
            status = %new.status,
            "print job created"
        );
        job
    }

    pub async fn get_job(&self, id: PrintJobId) -> Option<PrintJob> {
        let state = self.state.read().await;
        state.jobs.get(&id).cloned()
    }

    pub async fn list_jobs(&self) -> Vec<PrintJob> {
        let state = self.state.read().await;
        state.jobs.values().cloned().collect()
    }

    /// Jobs whose status is exactly `pending`.
    pub async fn list_pending(&self) -> Vec<PrintJob> {
        let state = self.state.read().await;
        state
            .jobs
            .values()
            .filter(|job| job.status == PrintJobStatus::Pending)
            .cloned()
            .collect()
    }

    /// Update the status of a job.
    ///
    /// `completed_at` is set when the new status is terminal and cleared
    /// otherwise. The error message is only replaced when one is given.
    /// Terminal jobs are never modified.
    pub async fn update_job_status(
        &self,
        id: PrintJobId,
        status: PrintJobStatus,
        error_message: Option<String>,
    ) -> Result<PrintJob, StoreError> {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        let job = state.open_job_mut(id)?;
        job.status = status;
        job.completed_at = status.is_terminal().then_some(now);
        if let Some(message) = error_message {
            job.error_message = Some(message);
        }
        Ok(job.clone())
    }

    /// Move a job to its terminal state and, on success, mark the attached
    /// receipt as printed in the same critical section.
    pub async fn apply_outcome(
        &self,
        id: PrintJobId,
        outcome: &PrintOutcome,
    ) -> Result<PrintJob, StoreError> {
        let now = self.clock.now();
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let job = state.open_job_mut(id)?;
        job.status = outcome.status();
        job.completed_at = Some(now);
        if let PrintOutcome::Failed { message } = outcome {
            job.error_message = Some(message.clone());
        }
        let job = job.clone();

        if let (PrintOutcome::Completed, Some(receipt_id)) = (outcome, job.receipt_id) {
            match state.receipts.get_mut(&receipt_id) {
                Some(receipt) => receipt.printed = true,
                None => warn!(
                    job_id = id,
                    receipt_id,
                    "completed job references a missing receipt"
                ),
            }
        }
        Ok(job)
    }
}
