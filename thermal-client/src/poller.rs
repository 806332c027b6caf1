//! Polls a print job until it reaches a terminal status.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thermal_store::{PrintJob, PrintJobId, PrintJobStatus};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::PrinterApi;
use crate::error::ClientError;

/// How a poll ended.
#[derive(Debug)]
pub enum PollOutcome {
    Completed(PrintJob),
    Failed(PrintJob),
    /// A status fetch failed. Polling stops at the first failure.
    TransportFailed(ClientError),
    Cancelled,
}

/// Fetches a job once per interval, one request at a time, until the job is
/// terminal, a fetch fails, or the token is cancelled.
#[derive(Clone)]
pub struct JobPoller {
    api: Arc<dyn PrinterApi>,
    interval: Duration,
}

impl fmt::Debug for JobPoller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobPoller")
            .field("api", &"<dyn PrinterApi>")
            .field("interval", &self.interval)
            .finish()
    }
}

impl JobPoller {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new(api: Arc<dyn PrinterApi>, interval: Duration) -> Self {
        Self { api, interval }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The first fetch happens one interval after the call. Cancellation is
    /// observed while waiting between fetches; a fetch already in flight is
    /// allowed to finish.
    pub async fn poll(&self, job_id: PrintJobId, cancel: &CancellationToken) -> PollOutcome {
        let mut attempts: u32 = 0;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(job_id, attempts, "print job polling cancelled");
                    return PollOutcome::Cancelled;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }

            attempts += 1;
            match self.api.get_print_job(job_id).await {
                Ok(job) => match job.status {
                    PrintJobStatus::Completed => return PollOutcome::Completed(job),
                    PrintJobStatus::Failed => return PollOutcome::Failed(job),
                    PrintJobStatus::Pending | PrintJobStatus::Printing => {
                        debug!(
                            job_id,
                            attempts,
                            status = %job.status,
                            "print job not finished yet"
                        );
                    }
                },
                Err(error) => {
                    warn!(job_id, attempts, %error, "failed to check print status");
                    return PollOutcome::TransportFailed(error);
                }
            }
        }
    }
}
