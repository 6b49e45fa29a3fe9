//! `weather-client` — command-line entry point.
//!
//! Startup sequence:
//! 1. Parse the command line.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise structured logging.
//! 4. Build the [`ApiClient`] (derives the envelope key once).
//! 5. Run the command and print its result as JSON on stdout.

mod api;
mod cli;
mod config;
mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use api::ApiClient;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Command line
    // -----------------------------------------------------------------------
    let cli = cli::Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %cfg.api_base_url,
        "weather-client starting"
    );

    // -----------------------------------------------------------------------
    // 4. Client
    // -----------------------------------------------------------------------
    let client = ApiClient::new(&cfg).context("failed to build API client")?;

    // -----------------------------------------------------------------------
    // 5. Command
    // -----------------------------------------------------------------------
    let output = cli::run(cli.command, &client, &cfg).await.map_err(|e| {
        error!(error = %e, "command failed");
        e
    })?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
