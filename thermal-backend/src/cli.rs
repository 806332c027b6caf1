use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "thermal-backend", version, about = "Simulated thermal receipt printer API")]
pub struct CliArgs {
    /// Path to configuration file (TOML, YAML or JSON).
    #[arg(short = 'c', long = "config-path", env = "THERMAL_CONFIG_PATH")]
    pub config_path: Option<String>,
}
