//! The relay pipeline: window URL → fetch → map → post.
//!
//! One [`Pipeline::run`] is one invocation. The two network legs are strictly
//! sequential and any failure ends the invocation; nothing is retried or
//! buffered.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, info};

use crate::{
    map_observations,
    sink::GrafanaSink,
    upstream::{window_url, CarbonIntensityClient},
    Config, FetchError, MetricPoint, PostError, RegionalResponse, RelayError,
};

// ---

/// Source of regional carbon intensity windows.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RegionalResponse, FetchError>;
}

/// Destination for mapped metric points. Returns the sink's status text.
#[async_trait]
pub trait MetricSink: Send + Sync {
    async fn post(&self, points: &[MetricPoint]) -> Result<String, PostError>;
}

pub struct Pipeline<S, K> {
    // ---
    source: S,
    sink: K,
    base_url: String,
    postcode: String,
}

/// The production wiring: Carbon Intensity API in, Grafana out.
pub type RelayPipeline = Pipeline<CarbonIntensityClient, GrafanaSink>;

impl RelayPipeline {
    /// Build the production pipeline around a single pooled HTTP client.
    pub fn from_config(cfg: &Config) -> Result<Self, reqwest::Error> {
        // ---
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let source = CarbonIntensityClient::new(client.clone());
        let sink = GrafanaSink::new(
            client,
            cfg.grafana_api.clone(),
            cfg.grafana_user_id.clone(),
            cfg.grafana_api_key.clone(),
        );

        Ok(Pipeline::new(
            source,
            sink,
            cfg.carbon_intensity_api.clone(),
            cfg.postcode.clone(),
        ))
    }
}

impl<S, K> Pipeline<S, K>
where
    S: ObservationSource,
    K: MetricSink,
{
    pub fn new(source: S, sink: K, base_url: String, postcode: String) -> Self {
        Self {
            source,
            sink,
            base_url,
            postcode,
        }
    }

    /// Relay the 24 hour window ending now.
    pub async fn run(&self) -> Result<String, RelayError> {
        self.run_at(Utc::now()).await
    }

    /// Relay the 24 hour window ending at `now`.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<String, RelayError> {
        // ---
        let url = window_url(&self.base_url, now, &self.postcode);

        // Step 1: fetch
        let response = self.source.fetch(&url).await?;
        let region = response.data;
        info!(
            postcode = %region.postcode,
            regionid = ?region.regionid,
            region = ?region.shortname,
            dno = ?region.dnoregion,
            observations = region.data.len(),
            "Fetched carbon intensity window"
        );

        // Step 2: map
        let points = map_observations(&region.data, &region.postcode);
        debug!("Mapped {} observations into {} points", region.data.len(), points.len());

        // Step 3: post
        let status = self.sink.post(&points).await?;
        info!("Relay complete, sink answered '{}'", status);

        Ok(status)
    }
}
