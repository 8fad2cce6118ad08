#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data types owned and published by the feed engine.
//!
//! [`FilterState`] holds the user's per-category visibility toggles,
//! [`FeedSnapshot`] is the materialized filtered view of one fetch, and
//! [`ViewState`] is the engine's externally observable lifecycle stage.
//! All three are plain values; the scheduler in `crime_feed_engine` is
//! their single writer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use crime_feed_incident_models::{IncidentCategory, IncidentRecord};
use serde::{Deserialize, Serialize};

/// Per-category visibility toggles.
///
/// Every category of the closed taxonomy always has an entry: the map is
/// seeded from [`IncidentCategory::all`] and only existing entries are ever
/// flipped, so unknown categories cannot appear. Initial state: everything
/// enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    enabled: BTreeMap<IncidentCategory, bool>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            enabled: IncidentCategory::all().iter().map(|c| (*c, true)).collect(),
        }
    }
}

impl FilterState {
    /// Flips the toggle for `category`.
    pub fn toggle(&mut self, category: IncidentCategory) {
        if let Some(flag) = self.enabled.get_mut(&category) {
            *flag = !*flag;
        }
    }

    /// Sets the toggle for `category` explicitly.
    pub fn set(&mut self, category: IncidentCategory, enabled: bool) {
        if let Some(flag) = self.enabled.get_mut(&category) {
            *flag = enabled;
        }
    }

    /// Returns whether records of `category` are currently visible.
    #[must_use]
    pub fn is_enabled(&self, category: IncidentCategory) -> bool {
        self.enabled.get(&category).copied().unwrap_or(false)
    }

    /// Iterates the categories currently toggled on.
    pub fn enabled_categories(&self) -> impl Iterator<Item = IncidentCategory> + '_ {
        self.enabled
            .iter()
            .filter(|(_, on)| **on)
            .map(|(category, _)| *category)
    }
}

/// The materialized, filtered view of the feed at a point in time.
///
/// Recomputed on every fetch completion and every filter change; never
/// persisted. `visible` preserves the data source's record order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    /// Records whose category is enabled, in source order.
    pub visible: Vec<IncidentRecord>,
    /// Visible-record count per category. Every category of the taxonomy
    /// is present; disabled categories read zero.
    pub counts_by_category: BTreeMap<IncidentCategory, u64>,
    /// Completion time of the fetch this snapshot was derived from.
    /// `None` until the scheduler stamps it.
    pub last_updated: Option<DateTime<Utc>>,
}

impl FeedSnapshot {
    /// An empty snapshot: no visible records, all counts zero.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            visible: Vec::new(),
            counts_by_category: IncidentCategory::all().iter().map(|c| (*c, 0)).collect(),
            last_updated: None,
        }
    }
}

/// The engine's externally observable lifecycle stage.
///
/// The scheduler is the only writer. A previously known snapshot is
/// carried through `Loading` and `Error` so a consumer can keep showing
/// stale data instead of blanking while a refresh is in flight or after
/// a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum ViewState {
    /// Engine constructed, no fetch started yet.
    Idle,
    /// A fetch is in flight.
    Loading {
        /// Snapshot from before the refresh, if one exists.
        previous: Option<FeedSnapshot>,
    },
    /// The most recent fetch completed and was applied.
    Success {
        /// The freshly derived snapshot.
        snapshot: FeedSnapshot,
    },
    /// The most recent fetch failed.
    Error {
        /// Human-readable failure cause.
        message: String,
        /// Last successfully derived snapshot, preserved across failures.
        previous: Option<FeedSnapshot>,
    },
}

impl ViewState {
    /// Returns the current-or-previous snapshot for any variant.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&FeedSnapshot> {
        match self {
            Self::Idle => None,
            Self::Success { snapshot } => Some(snapshot),
            Self::Loading { previous } | Self::Error { previous, .. } => previous.as_ref(),
        }
    }

    /// Returns whether a fetch is currently in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_starts_all_enabled() {
        let filter = FilterState::default();
        for category in IncidentCategory::all() {
            assert!(filter.is_enabled(*category));
        }
    }

    #[test]
    fn toggle_flips_only_the_target() {
        let mut filter = FilterState::default();
        filter.toggle(IncidentCategory::Theft);
        assert!(!filter.is_enabled(IncidentCategory::Theft));
        assert!(filter.is_enabled(IncidentCategory::Assault));
        assert!(filter.is_enabled(IncidentCategory::Burglary));

        filter.toggle(IncidentCategory::Theft);
        assert!(filter.is_enabled(IncidentCategory::Theft));
    }

    #[test]
    fn enabled_categories_tracks_toggles() {
        let mut filter = FilterState::default();
        filter.set(IncidentCategory::Assault, false);
        let enabled: Vec<IncidentCategory> = filter.enabled_categories().collect();
        assert_eq!(
            enabled,
            vec![IncidentCategory::Theft, IncidentCategory::Burglary]
        );
    }

    #[test]
    fn empty_snapshot_covers_every_category() {
        let snapshot = FeedSnapshot::empty();
        assert!(snapshot.visible.is_empty());
        assert_eq!(
            snapshot.counts_by_category.len(),
            IncidentCategory::all().len()
        );
        assert!(snapshot.counts_by_category.values().all(|n| *n == 0));
        assert!(snapshot.last_updated.is_none());
    }

    #[test]
    fn view_state_exposes_current_or_previous_snapshot() {
        assert!(ViewState::Idle.snapshot().is_none());

        let snapshot = FeedSnapshot::empty();
        let success = ViewState::Success {
            snapshot: snapshot.clone(),
        };
        assert_eq!(success.snapshot(), Some(&snapshot));

        let loading = ViewState::Loading {
            previous: Some(snapshot.clone()),
        };
        assert_eq!(loading.snapshot(), Some(&snapshot));
        assert!(loading.is_loading());

        let error = ViewState::Error {
            message: "boom".to_string(),
            previous: Some(snapshot.clone()),
        };
        assert_eq!(error.snapshot(), Some(&snapshot));
    }
}
