//! `GET /health` for the hosting platform's liveness probe.
//!
//! Answers without running the relay, so probing never spends an upstream
//! request or writes to Grafana.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
