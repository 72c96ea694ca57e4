//! Grafana metrics sink.
//!
//! Posts the whole point list for one invocation as a single JSON array.

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use tracing::{debug, error, info};

use crate::{MetricPoint, MetricSink, PostError};

// ---

#[derive(Debug, Clone)]
pub struct GrafanaSink {
    // ---
    client: Client,
    url: String,
    user_id: String,
    api_key: String,
}

impl GrafanaSink {
    pub fn new(client: Client, url: String, user_id: String, api_key: String) -> Self {
        Self {
            client,
            url,
            user_id,
            api_key,
        }
    }

    async fn send(&self, points: &[MetricPoint]) -> Result<String, PostError> {
        // ---
        let body = serde_json::to_vec(points)?;
        debug!("POST {} points ({} bytes) to {}", points.len(), body.len(), self.url);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(format!("{}:{}", self.user_id, self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        // Only transport failures count as errors; the status is reported as-is.
        // Codes without a standard reason phrase are reported by number.
        let status = response.status();
        let status_text = status
            .canonical_reason()
            .unwrap_or(status.as_str())
            .to_string();
        info!(
            "Successful POST to {} {} {}",
            self.url,
            status.as_u16(),
            status_text
        );

        Ok(status_text)
    }
}

#[async_trait]
impl MetricSink for GrafanaSink {
    async fn post(&self, points: &[MetricPoint]) -> Result<String, PostError> {
        // ---
        self.send(points).await.inspect_err(|e| {
            error!("Error response from {}: {}", self.url, e);
        })
    }
}
