//! HTTP incident data source.
//!
//! Performs a single unparameterized GET against the provider endpoint
//! and normalizes the JSON body. The engine never asks the server to
//! filter; filtering is client-side over the full collection.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use crime_feed_incident_models::IncidentRecord;
use serde::Deserialize;

use crate::category_map::map_category;
use crate::{FetchError, IncidentSource};

/// Incident data source backed by an HTTP(S) endpoint.
///
/// The round trip is bounded by the timeout configured on the underlying
/// client; the source itself imposes no timeout and performs no retry.
pub struct HttpIncidentSource {
    client: reqwest::Client,
    api_url: String,
}

impl HttpIncidentSource {
    /// Creates a source for `api_url` with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the HTTP client cannot be constructed.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }
}

/// Raw record shape from the provider API.
#[derive(Debug, Deserialize)]
struct WireIncident {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "type")]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    location: Option<WireLocation>,
}

/// Coordinate pair as reported by the provider.
#[derive(Debug, Deserialize)]
struct WireLocation {
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
}

#[async_trait]
impl IncidentSource for HttpIncidentSource {
    fn name(&self) -> &str {
        &self.api_url
    }

    async fn fetch(&self) -> Result<Vec<IncidentRecord>, FetchError> {
        log::info!("Fetching incidents from {}", self.api_url);

        let response = self.client.get(&self.api_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let body = response.text().await?;
        let records = parse_body(&body)?;
        log::info!("Fetched {} incidents", records.len());
        Ok(records)
    }
}

/// Parses a response body into normalized records.
///
/// The body must be a JSON array. Individual records that are missing an
/// id, have an unmappable category, an unparseable date, or lack
/// coordinates are skipped with a warning rather than failing the whole
/// fetch.
fn parse_body(body: &str) -> Result<Vec<IncidentRecord>, FetchError> {
    let raw: Vec<WireIncident> = serde_json::from_str(body)?;

    let total = raw.len();
    let mut records = Vec::with_capacity(total);

    for wire in raw {
        let Some(id) = wire.id.filter(|id| !id.is_empty()) else {
            log::warn!("Skipping incident with missing id");
            continue;
        };

        let raw_category = wire.category.unwrap_or_default();
        let Some(category) = map_category(&raw_category) else {
            log::warn!("Skipping incident {id}: unknown category {raw_category:?}");
            continue;
        };

        let Some(occurred_at) = wire.date.as_deref().and_then(parse_wire_date) else {
            log::warn!("Skipping incident {id}: missing or unparseable date");
            continue;
        };

        let Some(location) = wire.location else {
            log::warn!("Skipping incident {id}: missing location");
            continue;
        };
        let (Some(latitude), Some(longitude)) = (location.lat, location.lng) else {
            log::warn!("Skipping incident {id}: incomplete coordinates");
            continue;
        };

        records.push(IncidentRecord {
            id,
            category,
            description: wire.description.unwrap_or_default(),
            occurred_at,
            latitude,
            longitude,
        });
    }

    if records.len() < total {
        log::warn!(
            "Dropped {} of {total} incidents during normalization",
            total - records.len()
        );
    }

    Ok(records)
}

/// Parses the provider's ISO-8601 date format, with and without a zone
/// designator: `"2025-06-01T12:00:00.000Z"` or `"2025-06-01T12:00:00"`.
fn parse_wire_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Zone-less timestamps are taken as UTC.
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    None
}
