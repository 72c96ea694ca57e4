use std::sync::Arc;

use axum::Router;

use crate::{MetricSink, ObservationSource, Pipeline};

mod health;
mod ingest;

// ---

pub fn router<S, K>(pipeline: Pipeline<S, K>) -> Router
where
    S: ObservationSource + 'static,
    K: MetricSink + 'static,
{
    // ---
    Router::new()
        .merge(ingest::router())
        .merge(health::router())
        .with_state(Arc::new(pipeline))
}
