//! Integration tests for the discovery and enrichment pipeline.
//!
//! These tests drive the Scout end to end through the mock backend:
//! 1. Discover a country's events
//! 2. Merge them into the persisted catalog
//! 3. Shallow-enrich the new ones
//! 4. Deep-search, draft and export

use std::sync::Arc;

use expo_scout::{
    testing::fixtures::{company, event, event_with},
    Catalog, Country, Event, FileStore, KeyValueStore, MemoryStore, MockBackend, Scout,
    ScoutConfig, ScoutError, ScoutEvent, SearchKind, DEFAULT_STORE_KEY,
};

const SINGAPORE_LISTING: &str = r#"```json
[
  {"name": "Known Expo", "startDate": "2026-05-01", "endDate": "2026-05-03",
   "venue": "Marina Bay Sands, Level B2"},
  {"name": "FoodTech Asia", "startDate": "2026-03-10", "endDate": "2026-03-12",
   "venue": "Singapore EXPO Hall 4", "description": "Food technology"}
]
```"#;

fn config() -> ScoutConfig {
    ScoutConfig::new().with_reference_year(2026)
}

/// Helper to seed a memory store with a catalog.
fn seeded_store(events: Vec<Event>) -> Arc<MemoryStore> {
    let blob = Catalog::from_events(events).to_blob().unwrap();
    Arc::new(MemoryStore::new().with_entry(DEFAULT_STORE_KEY, blob))
}

async fn stored_catalog(store: &impl KeyValueStore) -> Catalog {
    let blob = store.get(DEFAULT_STORE_KEY).await.unwrap().unwrap();
    Catalog::from_blob(&blob)
}

#[tokio::test]
async fn test_singapore_discovery_end_to_end() {
    let known = event_with(
        "Known Expo",
        "2026-05-01",
        Country::Singapore,
        vec![company("Acme"), company("Beta"), company("Gamma")],
    );
    let thai = event("Pack Expo", "2026-01-20", Country::Thailand);
    let store = seeded_store(vec![known.clone(), thai.clone()]);

    let backend = MockBackend::new()
        .with_reply(SearchKind::Discovery, SINGAPORE_LISTING)
        .with_reply_for(
            SearchKind::ShallowEnrichment,
            "FoodTech Asia",
            r#"{"organizer": null, "exhibitors": [{"name": "Tetra Pak", "email": "sg@tetrapak.com"}]}"#,
        );
    let scout = Scout::open(store.clone(), backend, config()).await.unwrap();
    let mut notices = scout.subscribe();

    let outcome = scout.discover(Country::Singapore).await.unwrap();
    assert_eq!(outcome.events, 2);
    assert_eq!(outcome.new_events, 1);
    assert_eq!(outcome.enrichment.queued, 1);
    assert_eq!(outcome.enrichment.enriched, 1);

    let catalog = scout.catalog().await;
    let names: Vec<_> = catalog.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Pack Expo", "FoodTech Asia", "Known Expo"]);

    let known_after = catalog.get(&known.id).unwrap();
    assert!(!known_after.is_new);
    assert_eq!(known_after.companies.len(), 3);

    let fresh = catalog.iter().find(|e| e.name == "FoodTech Asia").unwrap();
    assert!(fresh.is_new);
    assert_eq!(fresh.venue, expo_scout::Venue::SingaporeExpo);
    assert_eq!(fresh.companies.len(), 1);
    assert_eq!(fresh.companies[0].email, "sg@tetrapak.com");

    // Enriched events are never re-enriched
    let backend = scout.gateway().backend();
    assert_eq!(backend.call_count(SearchKind::ShallowEnrichment, "Known Expo"), 0);
    assert_eq!(backend.call_count(SearchKind::ShallowEnrichment, "FoodTech Asia"), 1);

    // The final state was persisted
    assert_eq!(stored_catalog(store.as_ref()).await, catalog);
    // Once per merge phase
    assert_eq!(store.write_count(), 2);

    let mut seen = Vec::new();
    while let Ok(notice) = notices.try_recv() {
        seen.push(notice);
    }
    assert!(matches!(
        seen.first(),
        Some(ScoutEvent::CatalogPublished { country: Country::Singapore, events: 2 })
    ));
    assert!(seen.contains(&ScoutEvent::Progress {
        country: Country::Singapore,
        progress: 1.0
    }));
    assert!(matches!(seen.last(), Some(ScoutEvent::DiscoveryCompleted { .. })));
}

#[tokio::test]
async fn test_rediscovery_drops_vanished_events() {
    let stale = event("Gone Show", "2026-02-01", Country::Singapore);
    let store = seeded_store(vec![stale.clone()]);
    let backend = MockBackend::new().with_reply(SearchKind::Discovery, SINGAPORE_LISTING);
    let scout = Scout::open(store, backend, config()).await.unwrap();

    scout.discover(Country::Singapore).await.unwrap();
    let catalog = scout.catalog().await;

    assert!(!catalog.contains(&stale.id));
    assert!(catalog.iter().all(|e| e.is_new));
}

#[tokio::test]
async fn test_discovery_failure_leaves_catalog_unchanged() {
    let known = event("Known Expo", "2026-05-01", Country::Singapore);
    let store = seeded_store(vec![known.clone()]);
    let backend = MockBackend::new().fail_kind(SearchKind::Discovery);
    let scout = Scout::open(store.clone(), backend, config()).await.unwrap();

    let err = scout.discover(Country::Singapore).await.unwrap_err();
    assert!(matches!(err, ScoutError::Discovery { country: Country::Singapore, .. }));
    assert_eq!(scout.catalog().await.events(), &[known]);
    assert_eq!(store.write_count(), 0);

    // The run lock was released
    assert!(matches!(
        scout.discover(Country::Singapore).await,
        Err(ScoutError::Discovery { .. })
    ));
}

#[tokio::test]
async fn test_enrichment_failure_keeps_event_empty() {
    let backend = MockBackend::new()
        .with_reply(SearchKind::Discovery, SINGAPORE_LISTING)
        .fail_kind(SearchKind::ShallowEnrichment);
    let scout = Scout::open(MemoryStore::new(), backend, config())
        .await
        .unwrap();

    let outcome = scout.discover(Country::Singapore).await.unwrap();

    assert_eq!(outcome.enrichment.left_empty, 2);
    assert!(scout.catalog().await.iter().all(|e| e.companies.is_empty()));
}

#[tokio::test]
async fn test_corrupt_blob_starts_empty() {
    let store = MemoryStore::new().with_entry(DEFAULT_STORE_KEY, "{not json");
    let scout = Scout::open(store, MockBackend::new(), config()).await.unwrap();
    assert!(scout.catalog().await.is_empty());
}

#[tokio::test]
async fn test_deep_search_dedups_and_persists() {
    let known = event_with("Known Expo", "2026-05-01", Country::Singapore, vec![company("Acme")]);
    let store = seeded_store(vec![known.clone()]);
    let backend = MockBackend::new().with_reply(
        SearchKind::DeepEnrichment,
        r#"[{"name": "acme"}, {"name": "Beta", "role": "Platinum Sponsor"}, {"name": "Gamma", "role": "Exhibitor"}]"#,
    );
    let scout = Scout::open(store.clone(), backend, config()).await.unwrap();

    let outcome = scout.deep_search(&known.id).await.unwrap();
    assert_eq!(outcome.found, 3);
    assert_eq!(outcome.added, 2);

    let persisted = stored_catalog(store.as_ref()).await;
    let names: Vec<_> = persisted
        .get(&known.id)
        .unwrap()
        .companies
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Acme", "Beta", "Gamma"]);
    assert_eq!(
        persisted.get(&known.id).unwrap().companies[1].role,
        expo_scout::CompanyRole::PartnerSponsor
    );
}

#[tokio::test]
async fn test_catalog_survives_reopen_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let backend = MockBackend::new().with_reply(SearchKind::Discovery, SINGAPORE_LISTING);

    let first = {
        let store = FileStore::open(dir.path()).await.unwrap();
        let scout = Scout::open(store, backend.clone(), config()).await.unwrap();
        scout.discover(Country::Singapore).await.unwrap();
        scout.catalog().await
    };

    let store = FileStore::open(dir.path()).await.unwrap();
    let scout = Scout::open(store, backend, config()).await.unwrap();
    assert_eq!(scout.catalog().await, first);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn test_draft_and_export() {
    let known = event_with("Known Expo", "2026-05-01", Country::Singapore, vec![company("Acme")]);
    let empty = event("Quiet Show", "2026-06-01", Country::Germany);
    let backend = MockBackend::new().fail_kind(SearchKind::EmailDraft);
    let scout = Scout::open(seeded_store(vec![known.clone(), empty]), backend, config())
        .await
        .unwrap();

    let draft = scout.draft_email(&known.id, None).await.unwrap();
    assert_eq!(draft.subject, "Inquiry regarding Known Expo");

    let rows = scout.export_rows().await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].company_name, "N/A");

    let csv = scout.export_csv().await.unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("Known Expo,Marina Bay Sands Expo,2026-05-01"));
}
