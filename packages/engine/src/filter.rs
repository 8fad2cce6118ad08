//! Pure filtering and per-category aggregation.

use std::collections::BTreeMap;

use crime_feed_engine_models::{FeedSnapshot, FilterState};
use crime_feed_incident_models::{IncidentCategory, IncidentRecord};

/// Derives the visible subset of `records` under `filter`, plus counts.
///
/// A record is visible iff its category is enabled; visibility preserves
/// input order and applies no sort. Counts cover the visible set only, so
/// a disabled category always reads zero, and every category of the
/// taxonomy is present in the map. Empty input yields an empty snapshot,
/// not an error.
///
/// `last_updated` is left unset; the scheduler stamps it with the fetch
/// completion time.
#[must_use]
pub fn apply(records: &[IncidentRecord], filter: &FilterState) -> FeedSnapshot {
    let mut counts_by_category: BTreeMap<IncidentCategory, u64> =
        IncidentCategory::all().iter().map(|c| (*c, 0)).collect();

    let mut visible = Vec::new();
    for record in records {
        if filter.is_enabled(record.category) {
            *counts_by_category.entry(record.category).or_insert(0) += 1;
            visible.push(record.clone());
        }
    }

    FeedSnapshot {
        visible,
        counts_by_category,
        last_updated: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str, category: IncidentCategory) -> IncidentRecord {
        IncidentRecord {
            id: id.to_string(),
            category,
            description: format!("incident {id}"),
            occurred_at: Utc::now(),
            latitude: 30.2672,
            longitude: -97.7431,
        }
    }

    fn one_of_each() -> Vec<IncidentRecord> {
        vec![
            record("1", IncidentCategory::Theft),
            record("2", IncidentCategory::Assault),
            record("3", IncidentCategory::Burglary),
        ]
    }

    #[test]
    fn all_enabled_shows_everything() {
        let snapshot = apply(&one_of_each(), &FilterState::default());
        assert_eq!(snapshot.visible.len(), 3);
        for category in IncidentCategory::all() {
            assert_eq!(snapshot.counts_by_category[category], 1);
        }
    }

    #[test]
    fn disabled_category_is_hidden_and_counts_zero() {
        let mut filter = FilterState::default();
        filter.set(IncidentCategory::Theft, false);

        let snapshot = apply(&one_of_each(), &filter);
        assert_eq!(snapshot.visible.len(), 2);
        assert_eq!(snapshot.counts_by_category[&IncidentCategory::Theft], 0);
        assert_eq!(snapshot.counts_by_category[&IncidentCategory::Assault], 1);
        assert_eq!(snapshot.counts_by_category[&IncidentCategory::Burglary], 1);
        assert!(
            snapshot
                .visible
                .iter()
                .all(|r| r.category != IncidentCategory::Theft)
        );
    }

    #[test]
    fn visibility_preserves_source_order() {
        let records = vec![
            record("a", IncidentCategory::Burglary),
            record("b", IncidentCategory::Theft),
            record("c", IncidentCategory::Burglary),
            record("d", IncidentCategory::Assault),
            record("e", IncidentCategory::Theft),
        ];
        let mut filter = FilterState::default();
        filter.set(IncidentCategory::Assault, false);

        let snapshot = apply(&records, &filter);
        let ids: Vec<&str> = snapshot.visible.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "e"]);
    }

    #[test]
    fn counts_sum_to_visible_length() {
        let records = vec![
            record("1", IncidentCategory::Theft),
            record("2", IncidentCategory::Theft),
            record("3", IncidentCategory::Assault),
            record("4", IncidentCategory::Burglary),
        ];
        let mut filter = FilterState::default();
        filter.set(IncidentCategory::Burglary, false);

        let snapshot = apply(&records, &filter);
        let total: u64 = snapshot.counts_by_category.values().sum();
        assert_eq!(total, snapshot.visible.len() as u64);
    }

    #[test]
    fn empty_input_yields_empty_snapshot() {
        let snapshot = apply(&[], &FilterState::default());
        assert!(snapshot.visible.is_empty());
        assert!(snapshot.counts_by_category.values().all(|n| *n == 0));
        assert_eq!(
            snapshot.counts_by_category.len(),
            IncidentCategory::all().len()
        );
    }

    #[test]
    fn applying_the_same_filter_twice_is_deterministic() {
        let records = one_of_each();
        let mut filter = FilterState::default();
        filter.set(IncidentCategory::Assault, false);

        assert_eq!(apply(&records, &filter), apply(&records, &filter));
    }
}
