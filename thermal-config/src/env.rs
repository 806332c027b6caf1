//! `THERMAL_*` environment overrides, applied after the config file.

use std::env;
use std::str::FromStr;

use crate::{Config, ConfigError};

fn text(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|err| ConfigError::Parse(format!("{key}: {err}")))
        })
        .transpose()
}

fn flag(key: &str) -> Result<Option<bool>, ConfigError> {
    text(key)
        .map(|raw| {
            parse_flag(&raw)
                .ok_or_else(|| ConfigError::Parse(format!("{key}: not a boolean: {raw}")))
        })
        .transpose()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

/// Comma separated list with blanks dropped.
fn origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

pub(crate) fn apply_overrides(config: &mut Config) -> Result<(), ConfigError> {
    if let Some(host) = text("THERMAL_SERVER_HOST") {
        config.server.host = host;
    }
    if let Some(port) = parsed("THERMAL_SERVER_PORT")? {
        config.server.port = port;
    }

    if let Some(level) = text("THERMAL_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = flag("THERMAL_LOG_JSON")? {
        config.logging.json = json;
    }

    if let Some(list) = text("THERMAL_CORS_ALLOWED_ORIGINS") {
        config.cors.allowed_origins = origins(&list);
    }
    if let Some(all) = flag("THERMAL_CORS_ALLOW_ALL_ORIGINS")? {
        config.cors.allow_all_origins = all;
    }

    let printer = &mut config.printer;
    if let Some(ms) = parsed("THERMAL_PRINT_DELAY_MS")? {
        printer.print_delay_ms = ms;
    }
    if let Some(ms) = parsed("THERMAL_TEST_PRINT_DELAY_MS")? {
        printer.test_print_delay_ms = ms;
    }
    if let Some(rate) = parsed("THERMAL_PRINT_SUCCESS_RATE")? {
        printer.success_rate = rate;
    }
    if let Some(message) = text("THERMAL_PRINT_FAILURE_MESSAGE") {
        printer.failure_message = message;
    }

    let client = &mut config.client;
    if let Some(url) = text("THERMAL_CLIENT_BASE_URL") {
        client.base_url = url;
    }
    if let Some(ms) = parsed("THERMAL_CLIENT_POLL_INTERVAL_MS")? {
        client.poll_interval_ms = ms;
    }
    if let Some(ms) = parsed("THERMAL_CLIENT_QUEUE_REFRESH_MS")? {
        client.queue_refresh_ms = ms;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        for raw in ["1", "TRUE", "Yes", " on "] {
            assert_eq!(parse_flag(raw), Some(true), "{raw}");
        }
        for raw in ["0", "False", "no", "OFF"] {
            assert_eq!(parse_flag(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn origin_list_drops_blanks() {
        assert_eq!(
            origins("https://a.example, https://b.example, , https://c.example,"),
            vec!["https://a.example", "https://b.example", "https://c.example"]
        );
    }

    // Only test in this crate that touches the process environment.
    #[test]
    fn overrides_win_over_defaults() {
        let keys = [
            "THERMAL_PRINT_DELAY_MS",
            "THERMAL_TEST_PRINT_DELAY_MS",
            "THERMAL_PRINT_FAILURE_MESSAGE",
            "THERMAL_CLIENT_POLL_INTERVAL_MS",
        ];
        env::set_var("THERMAL_PRINT_DELAY_MS", "50");
        env::set_var("THERMAL_TEST_PRINT_DELAY_MS", " 25 ");
        env::set_var("THERMAL_PRINT_FAILURE_MESSAGE", "Paper jam");
        env::set_var("THERMAL_CLIENT_POLL_INTERVAL_MS", "10");

        let config = crate::load_config::<&std::path::Path>(None);
        for key in keys {
            env::remove_var(key);
        }

        let config = config.unwrap();
        assert_eq!(config.printer.print_delay_ms, 50);
        assert_eq!(config.printer.test_print_delay_ms, 25);
        assert_eq!(config.printer.failure_message, "Paper jam");
        assert_eq!(config.client.poll_interval_ms, 10);
    }
}
