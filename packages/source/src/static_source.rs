//! In-memory incident source for demos and tests.

use async_trait::async_trait;
use chrono::Utc;
use crime_feed_incident_models::{IncidentCategory, IncidentRecord};

use crate::{FetchError, IncidentSource};

/// Incident source serving a fixed, in-memory collection.
///
/// Every fetch succeeds and returns a clone of the same records, so the
/// scheduler can be exercised end to end without a live endpoint.
pub struct StaticIncidentSource {
    records: Vec<IncidentRecord>,
}

impl StaticIncidentSource {
    /// Creates a source serving exactly `records`.
    #[must_use]
    pub const fn new(records: Vec<IncidentRecord>) -> Self {
        Self { records }
    }

    /// Creates a source with a small built-in demo dataset (downtown
    /// Austin coordinates, stamped with the current time).
    #[must_use]
    pub fn demo() -> Self {
        let now = Utc::now();
        Self::new(vec![
            IncidentRecord {
                id: "1".to_string(),
                category: IncidentCategory::Theft,
                description: "Stolen bicycle reported".to_string(),
                occurred_at: now,
                latitude: 30.2672,
                longitude: -97.7431,
            },
            IncidentRecord {
                id: "2".to_string(),
                category: IncidentCategory::Assault,
                description: "Assault reported near downtown".to_string(),
                occurred_at: now,
                latitude: 30.2685,
                longitude: -97.7420,
            },
            IncidentRecord {
                id: "3".to_string(),
                category: IncidentCategory::Burglary,
                description: "Residential burglary".to_string(),
                occurred_at: now,
                latitude: 30.2650,
                longitude: -97.7450,
            },
        ])
    }
}

#[async_trait]
impl IncidentSource for StaticIncidentSource {
    fn name(&self) -> &'static str {
        "built-in demo data"
    }

    async fn fetch(&self) -> Result<Vec<IncidentRecord>, FetchError> {
        Ok(self.records.clone())
    }
}
