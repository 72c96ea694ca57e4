//! Scheduler trigger: `POST /` runs the relay once.
//!
//! The scheduler delivers a CloudEvent whose payload carries nothing the relay
//! needs, so the body is ignored. A failed run answers `500` so the scheduled
//! execution is marked as failed.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info};

use crate::{MetricSink, ObservationSource, Pipeline};

// ---

#[derive(Serialize)]
struct IngestResponse {
    status: String,
}

#[derive(Serialize)]
struct IngestFailure {
    error: String,
}

pub fn router<S, K>() -> Router<Arc<Pipeline<S, K>>>
where
    S: ObservationSource + 'static,
    K: MetricSink + 'static,
{
    // ---
    Router::new().route("/", post(handler::<S, K>))
}

async fn handler<S, K>(State(pipeline): State<Arc<Pipeline<S, K>>>, headers: HeaderMap) -> Response
where
    S: ObservationSource + 'static,
    K: MetricSink + 'static,
{
    // ---
    let event_id = header_str(&headers, "ce-id");
    let event_type = header_str(&headers, "ce-type");
    info!(event_id, event_type, "POST / - Starting relay");

    match pipeline.run().await {
        Ok(status) => {
            info!(event_id, "POST / - Relay finished: {}", status);
            (StatusCode::OK, Json(IngestResponse { status })).into_response()
        }
        Err(e) => {
            error!(event_id, "POST / - Relay failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(IngestFailure {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}
