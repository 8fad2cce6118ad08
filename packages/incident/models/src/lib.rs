#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident category taxonomy and the canonical incident record.
//!
//! This crate defines the closed set of incident categories the feed
//! engine knows about. The data provider reports category names as free
//! text; everything downstream (filtering, counting, display) works in
//! terms of this fixed enumeration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The closed set of incident categories tracked by the feed.
///
/// The enumeration is fixed at compile time; categories reported by the
/// data source that do not map to a variant here are dropped during
/// normalization and never reach the filter engine.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase")]
pub enum IncidentCategory {
    /// Unlawful taking of property (larceny, shoplifting, stolen goods)
    Theft,
    /// Physical attack or threat against a person
    Assault,
    /// Unlawful entry to commit a felony or theft
    Burglary,
}

impl IncidentCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Theft, Self::Assault, Self::Burglary]
    }
}

/// A single reported incident, normalized from the data source.
///
/// Identity is `id`: two records with the same id describe the same
/// incident. Records are immutable values; the engine never merges or
/// mutates them after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Unique incident identifier from the data source.
    pub id: String,
    /// Category from the closed taxonomy.
    pub category: IncidentCategory,
    /// Free-text description of the incident.
    pub description: String,
    /// When the incident occurred.
    pub occurred_at: DateTime<Utc>,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}
