//! Application entry point for the `carbon-intensity-relay` job.
//!
//! This binary wires the relay together and exposes it to the scheduler:
//! - Loading configuration from environment variables or `.env`
//! - Initializing structured logging/tracing
//! - Building the relay pipeline around one pooled HTTP client
//! - Mounting the trigger and health routes via the `routes` gateway (EMBP pattern)
//! - Binding the Axum HTTP server and serving scheduler events
//!
//! # Environment Variables
//! - `POSTCODE`, `CARBON_INTENSITY_API`, `GRAFANA_API`, `GRAFANA_USER_ID`,
//!   `GRAFANA_API_KEY` (**required**) – see `config`
//! - `PORT` (optional) – listen port (default: 8080)
//! - `RELAY_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `RELAY_SPAN_EVENTS` (optional) – span event mode for tracing
//!
//! This module follows the Explicit Module Boundary Pattern (EMBP): siblings
//! import shared types through the re-exports below, never from each other's
//! internals.
use std::{env, io::IsTerminal, net::SocketAddr};

use axum::Router;
use dotenvy::dotenv;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use anyhow::Result;

mod config;
mod error;
mod models;
mod pipeline;
mod routes;
mod sink;
mod upstream;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{FetchError, PostError, RelayError};
pub use models::{map_observations, MetricPoint, RegionalResponse};
pub use pipeline::{MetricSink, ObservationSource, Pipeline, RelayPipeline};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let pipeline = RelayPipeline::from_config(&cfg)
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

    // Build app from routes gateway (EMBP)
    let app: Router = routes::router(pipeline);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ---

/// Install the global `tracing` subscriber for the relay.
///
/// Verbosity comes from `RUST_LOG` when set, otherwise `RELAY_LOG_LEVEL`
/// (default `debug`), with HTTP client internals held at `warn` so the per-leg
/// fetch/post lines stay readable. `RELAY_SPAN_EVENTS` and `FORCE_COLOR` tune
/// span events and ANSI output.
fn init_tracing() {
    // ---
    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events_from_env())
        .with_env_filter(log_filter_from_env())
        .with_ansi(color_from_env())
        .compact()
        .init();
}

fn log_filter_from_env() -> EnvFilter {
    // ---
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    let level = env::var("RELAY_LOG_LEVEL")
        .ok()
        .filter(|l| matches!(l.as_str(), "trace" | "debug" | "info" | "warn" | "error"))
        .unwrap_or_else(|| "debug".to_string());

    EnvFilter::new(format!("{level},hyper=warn,hyper_util=warn,reqwest=warn"))
}

/// `full` or `enter_exit`; anything else emits CLOSE only.
fn span_events_from_env() -> FmtSpan {
    match env::var("RELAY_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    }
}

/// Scheduler logs are usually captured, not a TTY; `FORCE_COLOR` overrides detection.
fn color_from_env() -> bool {
    match env::var("FORCE_COLOR").as_deref() {
        Ok("1" | "true" | "yes") => true,
        Ok("0" | "false" | "no") => false,
        _ => std::io::stdout().is_terminal(),
    }
}
