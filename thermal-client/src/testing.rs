//! In-memory [`PrinterApi`] for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thermal_store::{
    NewReceipt, PrintJob, PrintJobId, PrintJobStatus, Receipt, ReceiptId,
};

use crate::api::{PrinterApi, TestPrintStarted};
use crate::error::ClientError;

pub fn at() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-06-01T09:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn job(id: PrintJobId, receipt_id: Option<ReceiptId>, status: PrintJobStatus) -> PrintJob {
    PrintJob {
        id,
        receipt_id,
        status,
        created_at: at(),
        completed_at: status.is_terminal().then(at),
        error_message: None,
    }
}

pub fn failed(id: PrintJobId, message: Option<&str>) -> PrintJob {
    PrintJob {
        error_message: message.map(str::to_owned),
        ..job(id, Some(1), PrintJobStatus::Failed)
    }
}

pub fn server_error() -> ClientError {
    ClientError::Status {
        status: 500,
        message: "internal server error".into(),
    }
}

/// Replays queued job snapshots for `get_print_job`. Once the queue is
/// empty the job is reported as pending.
#[derive(Default)]
pub struct FakeApi {
    pub snapshots: Mutex<VecDeque<Result<PrintJob, ClientError>>>,
    pub fail_create: bool,
    pub fail_test_print: bool,
    pub fetches: AtomicUsize,
}

impl FakeApi {
    pub fn with_snapshots(snapshots: Vec<Result<PrintJob, ClientError>>) -> Self {
        Self {
            snapshots: Mutex::new(snapshots.into()),
            ..Self::default()
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PrinterApi for FakeApi {
    async fn create_receipt(&self, receipt: &NewReceipt) -> Result<Receipt, ClientError> {
        if self.fail_create {
            return Err(server_error());
        }
        Ok(Receipt {
            id: 1,
            store_name: receipt.store_name.clone(),
            order_number: receipt.order_number.clone(),
            customer: receipt.customer.clone(),
            date: at(),
            subtotal: receipt.subtotal,
            tax: receipt.tax,
            total: receipt.total,
            items: receipt.items.clone(),
            printed: false,
        })
    }

    async fn start_print(&self, receipt_id: ReceiptId) -> Result<PrintJob, ClientError> {
        Ok(job(1, Some(receipt_id), PrintJobStatus::Pending))
    }

    async fn start_test_print(&self) -> Result<TestPrintStarted, ClientError> {
        if self.fail_test_print {
            return Err(server_error());
        }
        Ok(TestPrintStarted {
            message: "Test print initiated".into(),
            print_job: job(1, None, PrintJobStatus::Pending),
        })
    }

    async fn get_print_job(&self, id: PrintJobId) -> Result<PrintJob, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.snapshots
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(job(id, Some(1), PrintJobStatus::Pending)))
    }

    async fn list_print_jobs(&self) -> Result<Vec<PrintJob>, ClientError> {
        Ok(Vec::new())
    }

    async fn list_pending_jobs(&self) -> Result<Vec<PrintJob>, ClientError> {
        Ok(vec![job(1, Some(1), PrintJobStatus::Pending)])
    }

    async fn list_receipts(&self) -> Result<Vec<Receipt>, ClientError> {
        Ok(Vec::new())
    }

    async fn get_receipt(&self, id: ReceiptId) -> Result<Receipt, ClientError> {
        Err(ClientError::Status {
            status: 404,
            message: format!("receipt {id} not found"),
        })
    }
}
