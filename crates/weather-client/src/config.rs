//! Configuration loading and validation for the weather client.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use std::time::Duration;

use anyhow::{Context, Result};
use envelope::{KeyError, SharedSecret};
use serde::Deserialize;
use url::Url;

/// Validated client configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Shared secret the envelope key is derived from. **Required.**
    ///
    /// Must match the server's value exactly, or every response fails to open.
    pub encryption_key: String,

    /// Base URL of the weather API; auth endpoints live under [`Config::auth_path`].
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Path segment, relative to the base URL, of the auth endpoints.
    #[serde(default = "default_auth_path")]
    pub auth_path: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    "http://localhost/weather_app".into()
}
fn default_auth_path() -> String {
    "auth".into()
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_environment(config::Environment::default())
    }

    fn from_environment(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        self.shared_secret()
            .context("ENCRYPTION_KEY is required and must not be empty")?;

        let url = Url::parse(&self.api_base_url)
            .with_context(|| format!("API_BASE_URL is not a valid URL: {}", self.api_base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("API_BASE_URL must use http or https");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }

    /// The shared secret as key material input.
    pub fn shared_secret(&self) -> Result<SharedSecret, KeyError> {
        SharedSecret::new(self.encryption_key.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("encryption_key", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("auth_path", &self.auth_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            encryption_key: "weatherapp2024secure".into(),
            api_base_url: default_api_base_url(),
            auth_path: default_auth_path(),
            request_timeout_secs: default_request_timeout(),
            log_level: default_log_level(),
        }
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::default().source(Some(map))
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_api_base_url(), "http://localhost/weather_app");
        assert_eq!(default_auth_path(), "auth");
        assert_eq!(default_request_timeout(), 30);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_secret() {
        let cfg = Config {
            encryption_key: " ".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let cfg = Config {
            api_base_url: "localhost/weather_app".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());

        let cfg = Config {
            api_base_url: "ftp://localhost/weather_app".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg = Config {
            request_timeout_secs: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn loads_from_environment_with_defaults() {
        let cfg = Config::from_environment(env(&[("ENCRYPTION_KEY", "weatherapp2024secure")]))
            .unwrap();
        assert_eq!(cfg.encryption_key, "weatherapp2024secure");
        assert_eq!(cfg.api_base_url, default_api_base_url());
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn missing_secret_fails_at_load() {
        assert!(Config::from_environment(env(&[])).is_err());
    }

    #[test]
    fn debug_redacts_secret() {
        let dbg = format!("{:?}", valid());
        assert!(dbg.contains("REDACTED"));
        assert!(!dbg.contains("weatherapp2024secure"));
    }
}
