#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident data source trait and normalization logic.
//!
//! The feed engine drives a single [`IncidentSource`]: one round trip
//! per refresh, no server-side filtering, no retry (re-attempts are the
//! scheduler's fixed-period responsibility). [`HttpIncidentSource`]
//! talks to a live endpoint; [`StaticIncidentSource`] serves built-in
//! records for demos and tests.

pub mod category_map;
pub mod http;
pub mod static_source;

use async_trait::async_trait;
use crime_feed_incident_models::IncidentRecord;

pub use http::HttpIncidentSource;
pub use static_source::StaticIncidentSource;

/// Errors that can occur while fetching incident data.
///
/// All variants render a human-readable cause via `Display`; none are
/// fatal; the scheduler stores the message in its error state and keeps
/// refreshing on its fixed period.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (connection error, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("unexpected HTTP status: {status}")]
    Status {
        /// The status code the server returned.
        status: reqwest::StatusCode,
    },

    /// The response body is not valid JSON of the expected shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response parsed but does not describe incident data.
    #[error("malformed response: {message}")]
    Malformed {
        /// Description of what went wrong.
        message: String,
    },
}

/// Trait implemented by every incident data provider.
///
/// A fetch returns the full unfiltered collection as reported by the
/// source. Bounding the round-trip time is the transport's job (e.g. the
/// timeout configured on the HTTP client); implementations do not retry.
#[async_trait]
pub trait IncidentSource: Send + Sync {
    /// Returns a label for this source, used in log messages.
    fn name(&self) -> &str;

    /// Performs a single round trip and returns the normalized records.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request fails, the server answers
    /// with a non-success status, or the body is malformed.
    async fn fetch(&self) -> Result<Vec<IncidentRecord>, FetchError>;
}
