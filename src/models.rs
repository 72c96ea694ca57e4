//! Data models for the carbon intensity relay.
//!
//! Upstream types mirror the regional intensity response of the Carbon
//! Intensity API; [`MetricPoint`] is the flat shape the Grafana endpoint takes.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Width of one upstream observation window, in seconds.
pub const INTERVAL_SECS: u32 = 1800;

// ---

/// Top-level body of `GET /regional/intensity/{from}/pt24h/postcode/{postcode}`.
#[derive(Debug, Deserialize)]
pub struct RegionalResponse {
    pub data: RegionalData,
}

/// Region descriptor plus the half-hour observations inside the window.
#[derive(Debug, Deserialize)]
pub struct RegionalData {
    // ---
    pub regionid: Option<u32>,
    pub dnoregion: Option<String>,
    pub shortname: Option<String>,
    pub postcode: String,
    pub data: Vec<Observation>,
}

/// One half-hour measurement window.
#[derive(Debug, Deserialize)]
pub struct Observation {
    // ---
    #[serde(deserialize_with = "deserialize_window_end")]
    pub to: DateTime<Utc>,
    pub intensity: Intensity,
    pub generationmix: Vec<FuelShare>,
}

#[derive(Debug, Deserialize)]
pub struct Intensity {
    /// Decoded as `f64` whether the API sends `266` or `266.5`.
    pub forecast: f64,
}

/// A fuel's percentage share of generation for one window.
#[derive(Debug, Deserialize)]
pub struct FuelShare {
    pub fuel: String,
    pub perc: f64,
}

/// Flat, timestamped metric point as accepted by the Grafana ingestion API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricPoint {
    // ---
    pub name: String,
    pub interval: u32,
    /// Always `f64`, so an integral forecast goes out as `266.0`; the sink
    /// treats both spellings as the same number.
    pub value: f64,
    pub tags: Vec<String>,
    pub time: i64,
}

// ---

impl MetricPoint {
    // ---
    pub fn intensity(intensity: &Intensity, time: i64, postcode: &str) -> Self {
        // ---
        MetricPoint {
            name: "intensity".to_string(),
            interval: INTERVAL_SECS,
            value: intensity.forecast,
            tags: vec![
                "type=intensity".to_string(),
                format!("postcode={}", postcode),
                "data-source=carbonintensity.intensity".to_string(),
            ],
            time,
        }
    }

    pub fn generation(share: &FuelShare, time: i64, postcode: &str) -> Self {
        // ---
        MetricPoint {
            name: share.fuel.clone(),
            interval: INTERVAL_SECS,
            value: share.perc,
            tags: vec![
                "type=generation".to_string(),
                format!("postcode={}", postcode),
                "data-source=carbonintensity.generation".to_string(),
            ],
            time,
        }
    }
}

impl Observation {
    // ---
    /// Unix seconds of the window end, rounded half-up from milliseconds.
    pub fn unix_time(&self) -> i64 {
        (self.to.timestamp_millis() + 500).div_euclid(1000)
    }

    /// Intensity point first, then one point per fuel in upstream order.
    pub fn to_metric_points(&self, postcode: &str) -> Vec<MetricPoint> {
        // ---
        let time = self.unix_time();

        let mut points = Vec::with_capacity(1 + self.generationmix.len());
        points.push(MetricPoint::intensity(&self.intensity, time, postcode));
        points.extend(
            self.generationmix
                .iter()
                .map(|share| MetricPoint::generation(share, time, postcode)),
        );
        points
    }
}

/// Flatten observations into metric points, preserving observation order.
pub fn map_observations(observations: &[Observation], postcode: &str) -> Vec<MetricPoint> {
    // ---
    observations
        .iter()
        .flat_map(|observation| observation.to_metric_points(postcode))
        .collect()
}

/// Parse an upstream timestamp.
///
/// The API emits minute resolution (`2024-01-01T12:30Z`); full RFC 3339 is
/// accepted as well.
pub fn parse_window_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    // ---
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%MZ").map(|n| n.and_utc()))
}

fn deserialize_window_end<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_window_timestamp(&raw)
        .map_err(|e| serde::de::Error::custom(format!("invalid window timestamp '{}': {}", raw, e)))
}
