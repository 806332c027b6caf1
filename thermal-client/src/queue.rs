//! Pending job listing for the printer status and print queue panels.

use std::time::Duration;

use thermal_store::PrintJob;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::PrinterApi;
use crate::error::ClientError;

pub const PRINTER_MODEL: &str = "Epson TM-T88VI";

/// Print queue panel text.
pub fn render_queue(jobs: &[PrintJob]) -> String {
    let mut out = String::from("Print Queue\n");
    if jobs.is_empty() {
        out.push_str("No pending print jobs\nAll receipts have been processed\n");
        return out;
    }
    for job in jobs {
        out.push_str(&format!(
            "Print Job #{:<6} {:<10} Created: {}\n",
            job.id,
            job.status.to_string(),
            job.created_at.format("%H:%M:%S")
        ));
    }
    out
}

/// Printer status panel text.
pub fn render_printer_panel(pending: usize) -> String {
    let noun = if pending == 1 { "job" } else { "jobs" };
    format!(
        "Printer Status: Connected\nModel: {PRINTER_MODEL}\nPaper: Ready\nQueue: {pending} {noun}\n"
    )
}

/// Fetch pending jobs right away and then every `every` until cancelled,
/// handing each result to `on_update`. Errors are passed through and the
/// watch carries on with the next refresh.
pub async fn watch_pending<F>(
    api: &dyn PrinterApi,
    every: Duration,
    cancel: &CancellationToken,
    mut on_update: F,
) where
    F: FnMut(Result<Vec<PrintJob>, ClientError>),
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("queue watch stopped");
                return;
            }
            _ = ticker.tick() => {}
        }
        on_update(api.list_pending_jobs().await);
    }
}
