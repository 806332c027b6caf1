//! On-disk configuration. Every field is optional and only overrides the
//! defaults it names.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::{Config, ConfigError};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub server: Option<ServerSection>,
    pub logging: Option<LoggingSection>,
    pub cors: Option<CorsSection>,
    pub printer: Option<PrinterSection>,
    pub client: Option<ClientSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub json: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CorsSection {
    pub allowed_origins: Option<Vec<String>>,
    pub allow_all_origins: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PrinterSection {
    pub print_delay_ms: Option<u64>,
    pub test_print_delay_ms: Option<u64>,
    pub success_rate: Option<f64>,
    pub failure_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    pub base_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub queue_refresh_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Yaml,
    Json,
    Unknown,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Format::Toml,
            Some("yaml" | "yml") => Format::Yaml,
            Some("json") => Format::Json,
            _ => Format::Unknown,
        }
    }
}

fn parse_error(err: impl std::fmt::Display) -> ConfigError {
    ConfigError::Parse(err.to_string())
}

impl ConfigFile {
    /// Read and parse `path`. The extension picks the format; anything else
    /// is tried against each enabled format in turn.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::parse(&text, Format::from_path(path))
    }

    fn parse(text: &str, format: Format) -> Result<Self, ConfigError> {
        match format {
            #[cfg(feature = "toml")]
            Format::Toml => toml::from_str(text).map_err(parse_error),
            #[cfg(feature = "yaml")]
            Format::Yaml => serde_yaml::from_str(text).map_err(parse_error),
            #[cfg(feature = "json")]
            Format::Json => serde_json::from_str(text).map_err(parse_error),
            _ => Self::sniff(text),
        }
    }

    fn sniff(text: &str) -> Result<Self, ConfigError> {
        #[cfg(feature = "json")]
        if let Ok(file) = serde_json::from_str(text) {
            return Ok(file);
        }
        #[cfg(feature = "toml")]
        if let Ok(file) = toml::from_str(text) {
            return Ok(file);
        }
        #[cfg(feature = "yaml")]
        if let Ok(file) = serde_yaml::from_str(text) {
            return Ok(file);
        }
        let _ = text;
        Err(ConfigError::Parse(
            "config is not valid in any enabled format".into(),
        ))
    }

    /// Overwrite every value of `config` this file sets.
    pub fn merge_into(self, config: &mut Config) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        if let Some(server) = self.server {
            set(&mut config.server.host, server.host);
            set(&mut config.server.port, server.port);
        }
        if let Some(logging) = self.logging {
            set(&mut config.logging.level, logging.level);
            set(&mut config.logging.json, logging.json);
        }
        if let Some(cors) = self.cors {
            set(&mut config.cors.allowed_origins, cors.allowed_origins);
            set(&mut config.cors.allow_all_origins, cors.allow_all_origins);
        }
        if let Some(printer) = self.printer {
            let target = &mut config.printer;
            set(&mut target.print_delay_ms, printer.print_delay_ms);
            set(&mut target.test_print_delay_ms, printer.test_print_delay_ms);
            set(&mut target.success_rate, printer.success_rate);
            set(&mut target.failure_message, printer.failure_message);
        }
        if let Some(client) = self.client {
            set(&mut config.client.base_url, client.base_url);
            set(&mut config.client.poll_interval_ms, client.poll_interval_ms);
            set(&mut config.client.queue_refresh_ms, client.queue_refresh_ms);
        }
    }
}
