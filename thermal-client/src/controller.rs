//! Submit, print and follow a receipt through to a user-facing result.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thermal_store::{PrintJob, Receipt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::PrinterApi;
use crate::draft::ReceiptDraft;
use crate::error::ClientError;
use crate::poller::{JobPoller, PollOutcome};
use crate::status::{PrintStatus, StatusBoard};

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            destructive: false,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            destructive: true,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Result of one print or test print.
///
/// `notice` is `None` only when the poll was cancelled.
#[derive(Debug, Clone)]
pub struct PrintReport {
    pub status: PrintStatus,
    pub notice: Option<Notice>,
    /// The receipt as created; its `printed` flag is not refreshed.
    pub receipt: Option<Receipt>,
    /// The last job snapshot seen.
    pub job: Option<PrintJob>,
}

/// Drives a print from draft to terminal status, publishing status changes
/// on its [`StatusBoard`].
pub struct PrintController {
    api: Arc<dyn PrinterApi>,
    poller: JobPoller,
    status: StatusBoard,
}

impl fmt::Debug for PrintController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintController")
            .field("poller", &self.poller)
            .field("status", &self.status.current())
            .finish()
    }
}

impl PrintController {
    pub fn new(api: Arc<dyn PrinterApi>, poll_interval: Duration) -> Self {
        Self {
            poller: JobPoller::new(Arc::clone(&api), poll_interval),
            api,
            status: StatusBoard::new(),
        }
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    /// Create the receipt, start printing it and poll the job.
    ///
    /// Fails only with [`ClientError::PrintInProgress`]; every other problem
    /// ends in an `error` status with a notice.
    pub async fn print_receipt(
        &self,
        draft: &ReceiptDraft,
        cancel: &CancellationToken,
    ) -> Result<PrintReport, ClientError> {
        self.status.begin()?;

        let (receipt, job) = match self.submit(draft).await {
            Ok(submitted) => submitted,
            Err(error) => {
                warn!(%error, "print submission failed");
                return Ok(self.settle(
                    PrintStatus::Error,
                    Some(Notice::destructive("Print Failed", "Failed to create receipt")),
                    None,
                    None,
                ));
            }
        };

        let report = match self.poller.poll(job.id, cancel).await {
            PollOutcome::Completed(job) => self.settle(
                PrintStatus::Success,
                Some(Notice::info("Print Successful", "Receipt printed successfully")),
                Some(receipt),
                Some(job),
            ),
            PollOutcome::Failed(job) => {
                let description = job
                    .error_message
                    .clone()
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| "Unknown error occurred".to_string());
                self.settle(
                    PrintStatus::Error,
                    Some(Notice::destructive("Print Failed", description)),
                    Some(receipt),
                    Some(job),
                )
            }
            PollOutcome::TransportFailed(_) => self.settle(
                PrintStatus::Error,
                Some(Notice::destructive("Print Failed", "Failed to check print status")),
                Some(receipt),
                Some(job),
            ),
            PollOutcome::Cancelled => {
                self.settle(PrintStatus::Ready, None, Some(receipt), Some(job))
            }
        };
        Ok(report)
    }

    /// Start a test print and poll it like any other job.
    pub async fn test_print(&self, cancel: &CancellationToken) -> Result<PrintReport, ClientError> {
        self.status.begin()?;

        let job = match self.api.start_test_print().await {
            Ok(started) => started.print_job,
            Err(error) => {
                warn!(%error, "test print request failed");
                return Ok(self.settle(
                    PrintStatus::Error,
                    Some(test_print_failed()),
                    None,
                    None,
                ));
            }
        };
        info!(job_id = job.id, "test print submitted");

        let report = match self.poller.poll(job.id, cancel).await {
            PollOutcome::Completed(job) => self.settle(
                PrintStatus::Success,
                Some(Notice::info("Test Print Successful", "Test page printed successfully")),
                None,
                Some(job),
            ),
            PollOutcome::Failed(job) => {
                self.settle(PrintStatus::Error, Some(test_print_failed()), None, Some(job))
            }
            PollOutcome::TransportFailed(_) => {
                self.settle(PrintStatus::Error, Some(test_print_failed()), None, Some(job))
            }
            PollOutcome::Cancelled => self.settle(PrintStatus::Ready, None, None, Some(job)),
        };
        Ok(report)
    }

    async fn submit(&self, draft: &ReceiptDraft) -> Result<(Receipt, PrintJob), ClientError> {
        let new_receipt = draft.to_new_receipt()?;
        let receipt = self.api.create_receipt(&new_receipt).await?;
        let job = self.api.start_print(receipt.id).await?;
        info!(receipt_id = receipt.id, job_id = job.id, "print job submitted");
        Ok((receipt, job))
    }

    fn settle(
        &self,
        status: PrintStatus,
        notice: Option<Notice>,
        receipt: Option<Receipt>,
        job: Option<PrintJob>,
    ) -> PrintReport {
        self.status.finish(status);
        info!(
            %status,
            job_id = job.as_ref().map(|j| j.id),
            notice = notice.as_ref().map(|n| n.description.as_str()).unwrap_or("-"),
            "print finished"
        );
        PrintReport {
            status,
            notice,
            receipt,
            job,
        }
    }
}

fn test_print_failed() -> Notice {
    Notice::destructive("Test Print Failed", "Failed to print test page")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{failed, job, server_error, FakeApi};
    use chrono::NaiveDate;
    use thermal_store::PrintJobStatus;

    fn draft() -> ReceiptDraft {
        ReceiptDraft::demo(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    fn controller(api: FakeApi) -> PrintController {
        PrintController::new(Arc::new(api), Duration::from_millis(10))
    }

    #[tokio::test(start_paused = true)]
    async fn successful_print() {
        let ctl = controller(FakeApi::with_snapshots(vec![Ok(job(
            1,
            Some(1),
            PrintJobStatus::Completed,
        ))]));
        let report = ctl.print_receipt(&draft(), &CancellationToken::new()).await.unwrap();
        assert_eq!(report.status, PrintStatus::Success);
        assert_eq!(
            report.notice,
            Some(Notice::info("Print Successful", "Receipt printed successfully"))
        );
        assert_eq!(report.receipt.unwrap().total.to_string(), "9.18");
        assert_eq!(ctl.status().current(), PrintStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_print_uses_job_message_or_fallback() {
        let ctl = controller(FakeApi::with_snapshots(vec![
            Ok(failed(1, Some("Printer connection failed"))),
            Ok(failed(1, None)),
        ]));
        let report = ctl.print_receipt(&draft(), &CancellationToken::new()).await.unwrap();
        let notice = report.notice.unwrap();
        assert!(notice.destructive);
        assert_eq!(notice.description, "Printer connection failed");

        let report = ctl.print_receipt(&draft(), &CancellationToken::new()).await.unwrap();
        assert_eq!(report.notice.unwrap().description, "Unknown error occurred");
        assert_eq!(ctl.status().current(), PrintStatus::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_error_reports_status_check_failure() {
        let ctl = controller(FakeApi::with_snapshots(vec![Err(server_error())]));
        let report = ctl.print_receipt(&draft(), &CancellationToken::new()).await.unwrap();
        assert_eq!(report.status, PrintStatus::Error);
        assert_eq!(
            report.notice,
            Some(Notice::destructive("Print Failed", "Failed to check print status"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn create_failure_reports_receipt_failure() {
        let api = FakeApi {
            fail_create: true,
            ..FakeApi::default()
        };
        let ctl = controller(api);
        let report = ctl.print_receipt(&draft(), &CancellationToken::new()).await.unwrap();
        assert_eq!(report.status, PrintStatus::Error);
        assert_eq!(report.notice.unwrap().description, "Failed to create receipt");
        assert!(report.job.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_draft_is_never_sent() {
        let ctl = controller(FakeApi::default());
        let mut draft = draft();
        draft.items = vec![thermal_store::ReceiptItem::new(
            "Pallet",
            thermal_store::Money::MAX,
            1,
        )];
        let report = ctl.print_receipt(&draft, &CancellationToken::new()).await.unwrap();
        assert_eq!(report.status, PrintStatus::Error);
        assert_eq!(report.notice.unwrap().description, "Failed to create receipt");
        assert!(report.receipt.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn second_submission_while_printing_is_rejected() {
        let ctl = Arc::new(controller(FakeApi::default()));
        let cancel = CancellationToken::new();

        let running = {
            let ctl = Arc::clone(&ctl);
            let cancel = cancel.clone();
            tokio::spawn(async move { ctl.print_receipt(&draft(), &cancel).await })
        };
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(ctl.status().current(), PrintStatus::Printing);
        assert!(matches!(
            ctl.test_print(&CancellationToken::new()).await,
            Err(ClientError::PrintInProgress)
        ));

        cancel.cancel();
        let report = running.await.unwrap().unwrap();
        assert_eq!(report.status, PrintStatus::Ready);
        assert!(report.notice.is_none());
        assert_eq!(ctl.status().current(), PrintStatus::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_print_outcomes() {
        let ctl = controller(FakeApi::with_snapshots(vec![Ok(job(
            1,
            None,
            PrintJobStatus::Completed,
        ))]));
        let report = ctl.test_print(&CancellationToken::new()).await.unwrap();
        assert_eq!(
            report.notice,
            Some(Notice::info("Test Print Successful", "Test page printed successfully"))
        );

        let ctl = controller(FakeApi {
            fail_test_print: true,
            ..FakeApi::default()
        });
        let report = ctl.test_print(&CancellationToken::new()).await.unwrap();
        assert_eq!(report.status, PrintStatus::Error);
        assert_eq!(
            report.notice,
            Some(Notice::destructive("Test Print Failed", "Failed to print test page"))
        );
    }
}
