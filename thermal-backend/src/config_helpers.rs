use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use thermal_config::{Config, PrinterConfig};
use thermal_simulator::{PrintSimulator, RandomOutcomes, SimulatorSettings, TokioScheduler};
use thermal_store::PrintStore;

use crate::state::AppState;

/// Parse host:port into a SocketAddr, with fallback to 0.0.0.0.
pub fn parse_bind_address(host: &str, port: u16) -> SocketAddr {
    host.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, port))
        .or_else(|_| host.parse::<SocketAddr>())
        .or_else(|_| host.parse::<Ipv6Addr>().map(|ip| SocketAddr::new(IpAddr::V6(ip), port)))
        .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], port)))
}

/// Build simulator timing from the printer section.
pub fn simulator_settings_from_config(cfg: &PrinterConfig) -> SimulatorSettings {
    SimulatorSettings {
        print_delay: Duration::from_millis(cfg.print_delay_ms),
        test_print_delay: Duration::from_millis(cfg.test_print_delay_ms),
        failure_message: cfg.failure_message.clone(),
    }
}

/// Wire a fresh store and a Tokio-driven simulator from configuration.
pub fn app_state_from_config(cfg: &Config) -> AppState {
    let simulator = PrintSimulator::new(
        PrintStore::new(),
        Arc::new(TokioScheduler),
        Arc::new(RandomOutcomes::new(cfg.printer.success_rate)),
        simulator_settings_from_config(&cfg.printer),
    );
    AppState::new(simulator)
}
