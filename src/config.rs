//! Configuration loader for the `carbon-intensity-relay` job.
//!
//! All runtime settings come from environment variables (with optional `.env`
//! file support provided by the caller). The resulting [`Config`] is built once
//! at startup and handed to the pipeline, so nothing below `main.rs` reads the
//! environment directly.
//!
use std::env;

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u16 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u16>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed relay configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Outward postcode the upstream query is scoped to.
    pub postcode: String,

    /// Carbon Intensity API base URL (no trailing slash).
    pub carbon_intensity_api: String,

    /// Full Grafana metrics ingestion URL.
    pub grafana_api: String,

    /// Grafana user id, first half of the bearer token.
    pub grafana_user_id: String,

    /// Grafana API key, second half of the bearer token.
    pub grafana_api_key: String,

    /// Port the trigger endpoint listens on.
    pub port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `POSTCODE` – outward postcode, e.g. `RG10`
/// - `CARBON_INTENSITY_API` – upstream base URL
/// - `GRAFANA_API` – metrics sink URL
/// - `GRAFANA_USER_ID` – sink user id
/// - `GRAFANA_API_KEY` – sink API key
///
/// Optional:
/// - `PORT` – trigger listen port (default: 8080)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let postcode = require_env!("POSTCODE");
    let carbon_intensity_api = require_env!("CARBON_INTENSITY_API");
    let grafana_api = require_env!("GRAFANA_API");
    let grafana_user_id = require_env!("GRAFANA_USER_ID");
    let grafana_api_key = require_env!("GRAFANA_API_KEY");
    let port = parse_env_u16!("PORT", 8080);

    Ok(Config {
        postcode,
        carbon_intensity_api,
        grafana_api,
        grafana_user_id,
        grafana_api_key,
        port,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// The API key is masked; everything else is shown as loaded.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  POSTCODE             : {}", self.postcode);
        tracing::info!("  CARBON_INTENSITY_API : {}", self.carbon_intensity_api);
        tracing::info!("  GRAFANA_API          : {}", self.grafana_api);
        tracing::info!("  GRAFANA_USER_ID      : {}", self.grafana_user_id);
        tracing::info!("  GRAFANA_API_KEY      : {}", mask_secret(&self.grafana_api_key));
        tracing::info!("  PORT                 : {}", self.port);
    }
}

/// Keep the last four characters of a secret, star out the rest.
fn mask_secret(secret: &str) -> String {
    // ---
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
