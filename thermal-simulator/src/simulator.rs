//! Print job simulation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thermal_store::{
    NewPrintJob, PrintJob, PrintJobId, PrintOutcome, PrintStore, ReceiptId, StoreError,
};
use tracing::{info, warn};

use crate::error::SimulatorError;
use crate::outcome::{OutcomeSource, Verdict};
use crate::scheduler::Scheduler;

/// Timing of simulated prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorSettings {
    pub print_delay: Duration,
    pub test_print_delay: Duration,
    /// Error message recorded on failed jobs.
    pub failure_message: String,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            print_delay: Duration::from_millis(2000),
            test_print_delay: Duration::from_millis(1000),
            failure_message: "Printer connection failed".to_string(),
        }
    }
}

/// Creates print jobs and schedules their one-time terminal transition.
#[derive(Clone)]
pub struct PrintSimulator {
    store: PrintStore,
    scheduler: Arc<dyn Scheduler>,
    outcomes: Arc<dyn OutcomeSource>,
    settings: SimulatorSettings,
}

impl fmt::Debug for PrintSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintSimulator")
            .field("store", &self.store)
            .field("scheduler", &"<dyn Scheduler>")
            .field("outcomes", &"<dyn OutcomeSource>")
            .field("settings", &self.settings)
            .finish()
    }
}

impl PrintSimulator {
    pub fn new(
        store: PrintStore,
        scheduler: Arc<dyn Scheduler>,
        outcomes: Arc<dyn OutcomeSource>,
        settings: SimulatorSettings,
    ) -> Self {
        Self {
            store,
            scheduler,
            outcomes,
            settings,
        }
    }

    #[inline]
    pub fn store(&self) -> &PrintStore {
        &self.store
    }

    #[inline]
    pub fn settings(&self) -> &SimulatorSettings {
        &self.settings
    }

    /// Create a pending job for an existing receipt and schedule its outcome.
    ///
    /// The returned job is still pending. After `print_delay` the outcome
    /// source decides between completion (which also marks the receipt
    /// printed) and failure with the configured message.
    pub async fn start_print(&self, receipt_id: ReceiptId) -> Result<PrintJob, SimulatorError> {
        if self.store.get_receipt(receipt_id).await.is_none() {
            return Err(SimulatorError::ReceiptNotFound(receipt_id));
        }

        let job = self.store.create_job(NewPrintJob::for_receipt(receipt_id)).await;

        let store = self.store.clone();
        let outcomes = Arc::clone(&self.outcomes);
        let failure_message = self.settings.failure_message.clone();
        let job_id = job.id;
        self.scheduler.schedule(
            self.settings.print_delay,
            Box::pin(async move {
                let outcome = match outcomes.draw() {
                    Verdict::Success => PrintOutcome::Completed,
                    Verdict::Failure => PrintOutcome::Failed {
                        message: failure_message,
                    },
                };
                finish(&store, job_id, outcome).await;
            }),
        );

        info!(
            job_id,
            receipt_id,
            delay_ms = self.settings.print_delay.as_millis() as u64,
            "print job scheduled"
        );
        Ok(job)
    }

    /// Create an unattached job that always completes after the shorter
    /// test-print delay.
    pub async fn start_test_print(&self) -> PrintJob {
        let job = self.store.create_job(NewPrintJob::test_print()).await;

        let store = self.store.clone();
        let job_id = job.id;
        self.scheduler.schedule(
            self.settings.test_print_delay,
            Box::pin(async move {
                finish(&store, job_id, PrintOutcome::Completed).await;
            }),
        );

        info!(
            job_id,
            delay_ms = self.settings.test_print_delay.as_millis() as u64,
            "test print scheduled"
        );
        job
    }
}

async fn finish(store: &PrintStore, job_id: PrintJobId, outcome: PrintOutcome) {
    match store.apply_outcome(job_id, &outcome).await {
        Ok(job) => info!(
            job_id,
            status = %job.status,
            error = job.error_message.as_deref().unwrap_or("-"),
            "simulated print finished"
        ),
        Err(StoreError::TerminalState { status, .. }) => {
            warn!(job_id, %status, "print job already finished; skipping simulated outcome")
        }
        Err(error) => warn!(job_id, %error, "could not apply simulated outcome"),
    }
}
