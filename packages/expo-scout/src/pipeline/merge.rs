//! Catalog merge: fold a discovery pass into the catalog.
//!
//! Discovery for a country runs in two phases. The provisional merge marks
//! new events, carries known companies over and publishes the result before
//! enrichment starts. The final merge writes the enriched working set back.
//! Both replace the country's events wholesale.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::types::{
    catalog::Catalog,
    event::{DiscoveredEvent, Event},
    region::Country,
};

/// Output of the provisional merge.
#[derive(Debug, Clone)]
pub struct ProvisionalMerge {
    /// Catalog with the country replaced by the fresh set
    pub catalog: Catalog,

    /// Fresh events of the country, to be enriched in place
    pub working_set: Vec<Event>,
}

impl ProvisionalMerge {
    pub fn new_count(&self) -> usize {
        self.working_set.iter().filter(|e| e.is_new).count()
    }
}

/// Phase 1: merge a discovery batch for `country` into `catalog`.
///
/// Each fresh event is new when its id was absent from the catalog; known
/// events keep the companies already gathered for them. Repeated ids within
/// the batch keep their first occurrence.
pub fn merge_provisional(
    catalog: &Catalog,
    country: Country,
    discovered: Vec<DiscoveredEvent>,
) -> ProvisionalMerge {
    let mut seen = HashSet::new();
    let mut working_set = Vec::with_capacity(discovered.len());

    for fresh in discovered {
        let id = fresh.id();
        if !seen.insert(id.clone()) {
            warn!(%country, event = %fresh.name, "Dropping duplicate event in discovery batch");
            continue;
        }

        let event = match catalog.get(&id) {
            Some(existing) => Event::from_discovered(fresh, existing.companies.clone(), false),
            None => Event::from_discovered(fresh, Vec::new(), true),
        };
        working_set.push(event);
    }

    let catalog = catalog.replace_country(country, working_set.clone());
    debug!(
        %country,
        fresh = working_set.len(),
        total = catalog.len(),
        "Provisional merge complete"
    );

    ProvisionalMerge {
        catalog,
        working_set,
    }
}

/// Phase 2: write the enriched working set of `country` back into `catalog`.
pub fn merge_final(catalog: &Catalog, country: Country, working_set: Vec<Event>) -> Catalog {
    catalog.replace_country(country, working_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::{company, discovered, event, event_with};

    fn assert_invariants(catalog: &Catalog) {
        let mut ids = HashSet::new();
        for e in catalog.iter() {
            assert!(ids.insert(e.id.clone()), "duplicate id {}", e.id);
        }
        let dates: Vec<_> = catalog.iter().map(|e| e.date_start).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_is_new_reflects_prior_catalog() {
        let catalog = Catalog::from_events(vec![event("Known Show", "2026-05-01", Country::Singapore)]);
        let merged = merge_provisional(
            &catalog,
            Country::Singapore,
            vec![
                discovered("Known Show", "2026-05-01", Country::Singapore),
                discovered("Fresh Show", "2026-04-01", Country::Singapore),
            ],
        );

        let known = merged.working_set.iter().find(|e| e.name == "Known Show").unwrap();
        let fresh = merged.working_set.iter().find(|e| e.name == "Fresh Show").unwrap();
        assert!(!known.is_new);
        assert!(fresh.is_new);
        assert_eq!(merged.new_count(), 1);
        assert_invariants(&merged.catalog);
    }

    #[test]
    fn test_known_event_keeps_companies() {
        let catalog = Catalog::from_events(vec![event_with(
            "Known Show",
            "2026-05-01",
            Country::Singapore,
            vec![company("Acme"), company("Beta")],
        )]);
        let merged = merge_provisional(
            &catalog,
            Country::Singapore,
            vec![discovered("  KNOWN show ", "2026-05-01", Country::Singapore)],
        );

        assert_eq!(merged.working_set[0].companies.len(), 2);
        assert_eq!(merged.catalog.events()[0].companies.len(), 2);
    }

    #[test]
    fn test_country_is_replaced_wholesale() {
        let catalog = Catalog::from_events(vec![
            event("Dropped SG", "2026-01-10", Country::Singapore),
            event("Thai Show", "2026-02-01", Country::Thailand),
        ]);
        let merged = merge_provisional(
            &catalog,
            Country::Singapore,
            vec![discovered("Kept SG", "2026-03-01", Country::Singapore)],
        );

        let names: Vec<_> = merged.catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Thai Show", "Kept SG"]);
        assert_invariants(&merged.catalog);
    }

    #[test]
    fn test_duplicates_in_batch_collapse() {
        let merged = merge_provisional(
            &Catalog::new(),
            Country::Thailand,
            vec![
                discovered("ProPak Asia", "2026-06-10", Country::Thailand),
                discovered("propak asia", "2026-06-10", Country::Thailand),
                discovered("ProPak Asia", "2027-06-09", Country::Thailand),
            ],
        );
        assert_eq!(merged.working_set.len(), 2);
        assert_invariants(&merged.catalog);
    }

    #[test]
    fn test_final_merge_applies_enrichment() {
        let catalog = Catalog::from_events(vec![event("Other", "2026-01-01", Country::Germany)]);
        let merged = merge_provisional(
            &catalog,
            Country::Vietnam,
            vec![discovered("Vietnam Expo", "2026-04-01", Country::Vietnam)],
        );

        let mut working = merged.working_set.clone();
        working[0].companies.push(company("Vinamilk"));
        let final_catalog = merge_final(&merged.catalog, Country::Vietnam, working);

        assert_eq!(final_catalog.len(), 2);
        assert_eq!(final_catalog.get(&merged.working_set[0].id).unwrap().companies.len(), 1);
        assert_invariants(&final_catalog);
    }
}
