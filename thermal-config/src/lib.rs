//! Layered configuration shared by the printer server and the client.
//!
//! Values resolve in three layers: built-in defaults, an optional file
//! (TOML, YAML or JSON), then `THERMAL_*` environment variables.
//! [`load_config`] does not validate; call [`validate_config`] on the result.

mod env;
mod error;
mod file;
mod validate;

use std::path::Path;

use serde::Serialize;

pub use error::ConfigError;
pub use file::{
    ClientSection, ConfigFile, CorsSection, LoggingSection, PrinterSection, ServerSection,
};
pub use validate::validate_config;

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub cors: CorsConfig,
    pub printer: PrinterConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_all_origins: bool,
}

/// Timing and outcome weights of the simulated printer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrinterConfig {
    pub print_delay_ms: u64,
    pub test_print_delay_ms: u64,
    /// Probability in `[0, 1]` that a receipt print succeeds.
    pub success_rate: f64,
    pub failure_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientConfig {
    /// API root including the `/api` prefix.
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub queue_refresh_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
                allow_all_origins: false,
            },
            printer: PrinterConfig {
                print_delay_ms: 2000,
                test_print_delay_ms: 1000,
                success_rate: 0.8,
                failure_message: "Printer connection failed".to_string(),
            },
            client: ClientConfig {
                base_url: "http://127.0.0.1:5000/api".to_string(),
                poll_interval_ms: 1000,
                queue_refresh_ms: 2000,
            },
        }
    }
}

/// Resolve defaults, then `path` if given, then the environment.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    if let Some(path) = path {
        ConfigFile::from_path(path)?.merge_into(&mut config);
    }
    env::apply_overrides(&mut config)?;
    Ok(config)
}
