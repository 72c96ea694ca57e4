//! Carbon Intensity API access: window URL construction and the fetcher.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::{FetchError, ObservationSource, RegionalResponse};

// ---

/// Build the regional query URL for the 24 hour window ending at `now`.
///
/// `now` is rendered at minute resolution (`YYYY-MM-DDTHH:MMZ`), which is the
/// form the API accepts for `/pt24h` queries. Inputs are not validated.
pub fn window_url(base_url: &str, now: DateTime<Utc>, postcode: &str) -> String {
    // ---
    format!(
        "{}/regional/intensity/{}/pt24h/postcode/{}",
        base_url,
        now.format("%Y-%m-%dT%H:%MZ"),
        postcode
    )
}

/// HTTP client for the Carbon Intensity API.
#[derive(Debug, Clone)]
pub struct CarbonIntensityClient {
    client: Client,
}

impl CarbonIntensityClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn get_window(&self, url: &str) -> Result<RegionalResponse, FetchError> {
        // ---
        let response = self.client.get(url).send().await?;

        // The status is not used to decide success; the body is decoded either way.
        let status = response.status();
        if !status.is_success() {
            warn!("Carbon intensity API answered {} for {}", status, url);
        }

        let body = response.bytes().await?;
        debug!("Received {} bytes from {}", body.len(), url);

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ObservationSource for CarbonIntensityClient {
    async fn fetch(&self, url: &str) -> Result<RegionalResponse, FetchError> {
        // ---
        info!("Fetching from {}", url);

        match self.get_window(url).await {
            Ok(response) => {
                info!("Successful response from {}", url);
                Ok(response)
            }
            Err(e) => {
                error!("Error response from {}: {}", url, e);
                Err(e)
            }
        }
    }
}
