//! Incident category mapping utilities.
//!
//! Maps the data provider's free-text category strings to the closed
//! [`IncidentCategory`] taxonomy. Providers differ in naming conventions,
//! so matching is keyword-based and case-insensitive.

use crime_feed_incident_models::IncidentCategory;

/// Attempts to map a raw category string to the canonical taxonomy.
///
/// Returns `None` when no mapping can be determined; callers drop such
/// records during normalization so unknown categories never reach the
/// filter engine.
#[must_use]
pub fn map_category(raw: &str) -> Option<IncidentCategory> {
    let lower = raw.to_lowercase();

    // Burglary before theft: "burglary" descriptions often mention the
    // stolen property as well.
    if contains_any(&lower, &["burglary", "breaking and entering", "break-in"]) {
        return Some(IncidentCategory::Burglary);
    }
    if contains_any(
        &lower,
        &[
            "theft",
            "larceny",
            "stolen",
            "shoplifting",
            "pickpocket",
            "robbery",
        ],
    ) {
        return Some(IncidentCategory::Theft);
    }
    if contains_any(&lower, &["assault", "battery"]) {
        return Some(IncidentCategory::Assault);
    }

    None
}

/// Returns `true` if `haystack` contains any of the `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_exact_category_names() {
        assert_eq!(map_category("Theft"), Some(IncidentCategory::Theft));
        assert_eq!(map_category("Assault"), Some(IncidentCategory::Assault));
        assert_eq!(map_category("Burglary"), Some(IncidentCategory::Burglary));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(map_category("THEFT"), Some(IncidentCategory::Theft));
        assert_eq!(map_category("burglary"), Some(IncidentCategory::Burglary));
    }

    #[test]
    fn maps_provider_phrasings() {
        assert_eq!(
            map_category("Larceny from vehicle"),
            Some(IncidentCategory::Theft)
        );
        assert_eq!(
            map_category("Aggravated Assault"),
            Some(IncidentCategory::Assault)
        );
        assert_eq!(
            map_category("Residential breaking and entering"),
            Some(IncidentCategory::Burglary)
        );
    }

    #[test]
    fn burglary_wins_over_stolen_property_mentions() {
        assert_eq!(
            map_category("Burglary - property stolen"),
            Some(IncidentCategory::Burglary)
        );
    }

    #[test]
    fn unknown_categories_map_to_none() {
        assert_eq!(map_category("Jaywalking"), None);
        assert_eq!(map_category(""), None);
    }
}
