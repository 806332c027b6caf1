use std::net::IpAddr;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::{Config, ConfigError};

static HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    let label = "[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?";
    Regex::new(&format!(r"^{label}(\.{label})*$"))
        .unwrap_or_else(|err| panic!("hostname pattern: {err}"))
});

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}

fn http_url(value: &str, field: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|err| invalid(format!("{field}: {err}: {value}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("{field}: unsupported scheme {other}: {value}"))),
    }
}

/// Reject values that would only fail later at bind or request time.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let server = &config.server;
    if server.port == 0 {
        return Err(invalid("server.port must be > 0"));
    }
    if server.host.parse::<IpAddr>().is_err() && !HOSTNAME.is_match(&server.host) {
        return Err(invalid(format!("server.host is not an address or hostname: {}", server.host)));
    }

    let printer = &config.printer;
    if !(0.0..=1.0).contains(&printer.success_rate) {
        return Err(invalid(format!(
            "printer.success_rate must be within [0, 1], got {}",
            printer.success_rate
        )));
    }
    if printer.failure_message.trim().is_empty() {
        return Err(invalid("printer.failure_message must not be empty"));
    }

    let client = &config.client;
    if client.poll_interval_ms == 0 {
        return Err(invalid("client.poll_interval_ms must be > 0"));
    }
    if client.queue_refresh_ms == 0 {
        return Err(invalid("client.queue_refresh_ms must be > 0"));
    }
    http_url(&client.base_url, "client.base_url")?;

    for origin in config.cors.allowed_origins.iter().filter(|o| *o != "*") {
        http_url(origin, "cors.allowed_origins")?;
    }
    Ok(())
}
