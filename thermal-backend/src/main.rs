//! Thermal printer simulator backend.
//!
//! Entry point for the HTTP server with configuration loading and graceful
//! shutdown.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use thermal_backend::app::build_cors_layer;
use thermal_backend::config_helpers::{app_state_from_config, parse_bind_address};

mod cli;
mod tracing_setup;

use cli::CliArgs;
use tracing_setup::install_tracing_from_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = load_config(args.config_path.as_deref())?;
    install_tracing_from_config(&config.logging);
    tracing::info!(
        config_path = args.config_path.as_deref().unwrap_or("-"),
        print_delay_ms = config.printer.print_delay_ms,
        test_print_delay_ms = config.printer.test_print_delay_ms,
        success_rate = config.printer.success_rate,
        "configuration loaded"
    );

    let state = Arc::new(app_state_from_config(&config));
    let app = thermal_backend::build_router_with_cors(state, build_cors_layer(&config.cors));

    let addr = parse_bind_address(&config.server.host, config.server.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Load and validate configuration from file or defaults.
fn load_config(path: Option<&str>) -> anyhow::Result<thermal_config::Config> {
    let config = thermal_config::load_config(path)
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?;
    thermal_config::validate_config(&config)
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    Ok(config)
}

/// Wait for Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
