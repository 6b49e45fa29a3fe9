//! Command-line interface.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::api::{ApiClient, AuthService, WeatherService};
use crate::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "weather-client",
    version,
    about = "Client for the weather/auth API using encrypted JSON envelopes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and print the session payload.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "WEATHER_CLIENT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long, env = "WEATHER_CLIENT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Look up the current weather for a city.
    Weather {
        city: String,
        /// Record the search against this user.
        #[arg(long)]
        user_id: Option<u64>,
    },
    /// List recorded searches.
    History,
    /// Seal a JSON document into an envelope ciphertext (offline).
    Seal {
        /// JSON text, e.g. '{"city":"Oslo"}'.
        json: String,
    },
    /// Open an envelope ciphertext and print its JSON (offline).
    Open { ciphertext: String },
}

/// Execute `command` and return the value to print.
pub async fn run(command: Command, client: &ApiClient, cfg: &Config) -> Result<Value> {
    let value = match command {
        Command::Login { username, password } => {
            AuthService::new(client.clone(), &cfg.auth_path)
                .login(&username, &password)
                .await?
        }
        Command::Register { username, password } => {
            AuthService::new(client.clone(), &cfg.auth_path)
                .register(&username, &password)
                .await?
        }
        Command::Weather { city, user_id } => {
            WeatherService::new(client.clone())
                .get_weather(&city, user_id)
                .await?
        }
        Command::History => WeatherService::new(client.clone()).search_history().await?,
        Command::Seal { json } => {
            let payload: Value = serde_json::from_str(&json).context("argument is not valid JSON")?;
            Value::String(client.codec().seal_envelope(&payload)?)
        }
        // Local debugging aid, so the failing stage is shown.
        Command::Open { ciphertext } => client.codec().open_detailed(ciphertext.trim()).map_err(|e| {
            anyhow::anyhow!("failed to decrypt data (stage: {}): {e}", e.stage().as_str())
        })?,
    };
    Ok(value)
}
