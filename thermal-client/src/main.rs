//! `thermal-print`: drive the simulated printer from a terminal.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use thermal_client::preview::{render_receipt, RECEIPT_WIDTH};
use thermal_client::queue::{render_printer_panel, render_queue, watch_pending};
use thermal_client::{
    parse_item_arg, HttpPrinterApi, PrintController, PrintReport, PrintStatus, PrinterApi,
    ReceiptDraft,
};
use thermal_store::ReceiptItem;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "thermal-print",
    version,
    about = "Print receipts on the simulated thermal printer"
)]
struct Cli {
    /// Path to configuration file (TOML, YAML or JSON).
    #[arg(short = 'c', long = "config-path", env = "THERMAL_CONFIG_PATH", global = true)]
    config_path: Option<String>,

    /// API root, e.g. http://127.0.0.1:5000/api. Overrides the configuration.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a receipt, print it and wait for the result.
    Print(DraftArgs),
    /// Send a test page and wait for the result.
    Test,
    /// Show pending print jobs.
    Queue {
        /// Keep refreshing until interrupted.
        #[arg(long)]
        watch: bool,
    },
    /// Render the receipt as it would be printed.
    Preview(DraftArgs),
    /// List stored receipts.
    Receipts,
}

#[derive(Debug, Args)]
struct DraftArgs {
    #[arg(long)]
    store: Option<String>,
    #[arg(long)]
    order: Option<String>,
    #[arg(long)]
    customer: Option<String>,
    /// Line item as name=price[xqty]; repeat for more. Replaces the demo items.
    #[arg(long = "item", value_parser = parse_item_arg)]
    items: Vec<ReceiptItem>,
}

impl DraftArgs {
    fn into_draft(self) -> ReceiptDraft {
        let mut draft = ReceiptDraft::demo(chrono::Local::now().date_naive());
        if let Some(store) = self.store {
            draft.store_name = store;
        }
        if let Some(order) = self.order {
            draft.order_number = order;
        }
        if let Some(customer) = self.customer {
            draft.customer = customer;
        }
        if !self.items.is_empty() {
            draft.items = self.items;
        }
        draft
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let mut config = thermal_config::load_config(cli.config_path.as_deref())
        .context("failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config.client.base_url = base_url;
    }
    thermal_config::validate_config(&config).context("invalid configuration")?;

    let api: Arc<dyn PrinterApi> = Arc::new(HttpPrinterApi::new(config.client.base_url.clone()));
    let poll_interval = Duration::from_millis(config.client.poll_interval_ms);
    let refresh = Duration::from_millis(config.client.queue_refresh_ms);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    match cli.command {
        Command::Print(args) => {
            let draft = args.into_draft();
            print!("{}", render_receipt(&draft, RECEIPT_WIDTH)?);
            let controller = PrintController::new(api, poll_interval);
            follow_status(&controller);
            let report = controller.print_receipt(&draft, &cancel).await?;
            Ok(finish(report))
        }
        Command::Test => {
            let controller = PrintController::new(api, poll_interval);
            follow_status(&controller);
            let report = controller.test_print(&cancel).await?;
            Ok(finish(report))
        }
        Command::Queue { watch: false } => {
            let jobs = api.list_pending_jobs().await?;
            print!("{}", render_printer_panel(jobs.len()));
            print!("{}", render_queue(&jobs));
            Ok(ExitCode::SUCCESS)
        }
        Command::Queue { watch: true } => {
            watch_pending(api.as_ref(), refresh, &cancel, |result| match result {
                Ok(jobs) => {
                    print!("{}", render_printer_panel(jobs.len()));
                    println!("{}", render_queue(&jobs));
                }
                Err(error) => eprintln!("failed to load queue: {error}"),
            })
            .await;
            Ok(ExitCode::SUCCESS)
        }
        Command::Preview(args) => {
            print!("{}", render_receipt(&args.into_draft(), RECEIPT_WIDTH)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Receipts => {
            for receipt in api.list_receipts().await? {
                let items = receipt
                    .parsed_items()
                    .map(|items| items.len().to_string())
                    .unwrap_or_else(|_| "?".to_string());
                println!(
                    "#{:<4} {:<12} {:<20} {:>3} items ${:>8}  {}",
                    receipt.id,
                    receipt.order_number,
                    receipt.customer,
                    items,
                    receipt.total.to_string(),
                    if receipt.printed { "printed" } else { "not printed" }
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Echo status transitions to stderr while a print runs.
fn follow_status(controller: &PrintController) {
    let mut rx = controller.status().subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let status = *rx.borrow_and_update();
            eprintln!("{} - {}", status.headline(), status.detail());
        }
    });
}

fn finish(report: PrintReport) -> ExitCode {
    if let Some(notice) = &report.notice {
        println!("{notice}");
    }
    match report.status {
        PrintStatus::Success => ExitCode::SUCCESS,
        PrintStatus::Ready => ExitCode::from(130),
        PrintStatus::Printing | PrintStatus::Error => ExitCode::FAILURE,
    }
}
