//! HTTP transport for the printer API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thermal_store::{NewReceipt, PrintJob, PrintJobId, Receipt, ReceiptId};

use crate::error::ClientError;

/// Response of `POST /print/test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPrintStarted {
    pub message: String,
    pub print_job: PrintJob,
}

/// Operations the client needs from the printer server.
#[async_trait]
pub trait PrinterApi: Send + Sync {
    async fn create_receipt(&self, receipt: &NewReceipt) -> Result<Receipt, ClientError>;
    async fn start_print(&self, receipt_id: ReceiptId) -> Result<PrintJob, ClientError>;
    async fn start_test_print(&self) -> Result<TestPrintStarted, ClientError>;
    async fn get_print_job(&self, id: PrintJobId) -> Result<PrintJob, ClientError>;
    async fn list_print_jobs(&self) -> Result<Vec<PrintJob>, ClientError>;
    async fn list_pending_jobs(&self) -> Result<Vec<PrintJob>, ClientError>;
    async fn list_receipts(&self) -> Result<Vec<Receipt>, ClientError>;
    async fn get_receipt(&self, id: ReceiptId) -> Result<Receipt, ClientError>;
}

/// [`PrinterApi`] over HTTP using [`reqwest`].
#[derive(Debug, Clone)]
pub struct HttpPrinterApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPrinterApi {
    /// * `base_url` - API root including the `/api` prefix, e.g.
    ///   `http://127.0.0.1:5000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing [`reqwest::Client`] (and its connection pool).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::parse_response(response).await
    }

    /// Decode a successful body, or turn an error status into
    /// [`ClientError::Status`] carrying the server's `error` message.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_owned))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body
                }
            });
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl PrinterApi for HttpPrinterApi {
    async fn create_receipt(&self, receipt: &NewReceipt) -> Result<Receipt, ClientError> {
        let response = self
            .client
            .post(self.url("/receipts"))
            .json(receipt)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn start_print(&self, receipt_id: ReceiptId) -> Result<PrintJob, ClientError> {
        let response = self
            .client
            .post(self.url("/print"))
            .json(&json!({ "receiptId": receipt_id }))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn start_test_print(&self) -> Result<TestPrintStarted, ClientError> {
        let response = self.client.post(self.url("/print/test")).send().await?;
        Self::parse_response(response).await
    }

    async fn get_print_job(&self, id: PrintJobId) -> Result<PrintJob, ClientError> {
        self.get_json(&format!("/print-jobs/{id}")).await
    }

    async fn list_print_jobs(&self) -> Result<Vec<PrintJob>, ClientError> {
        self.get_json("/print-jobs").await
    }

    async fn list_pending_jobs(&self) -> Result<Vec<PrintJob>, ClientError> {
        self.get_json("/print-jobs/pending").await
    }

    async fn list_receipts(&self) -> Result<Vec<Receipt>, ClientError> {
        self.get_json("/receipts").await
    }

    async fn get_receipt(&self, id: ReceiptId) -> Result<Receipt, ClientError> {
        self.get_json(&format!("/receipts/{id}")).await
    }
}
