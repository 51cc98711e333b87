//! The Scout - main entry point for discovery and enrichment.
//!
//! The Scout owns the working catalog, the store it is persisted to, and the
//! search gateway. Every catalog write takes the catalog lock, reads the
//! latest snapshot, computes the next one and persists it before releasing
//! the lock, so stored snapshots are ordered like in-memory ones.
//!
//! Runs report what they do on a broadcast channel. See [`ScoutEvent`].

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::error::{Result, ScoutError};
use crate::export::{export_rows, to_csv, ExportRow};
use crate::gateway::SearchGateway;
use crate::pipeline::dedup::append_new_companies;
use crate::pipeline::enrich::{enrich_events, EnrichmentConfig, EnrichmentReport};
use crate::pipeline::merge::{merge_final, merge_provisional};
use crate::traits::{
    backend::SearchBackend,
    store::{load_catalog, save_catalog, KeyValueStore},
};
use crate::types::{
    catalog::Catalog,
    config::ScoutConfig,
    email::EmailDraft,
    event::{Event, DATE_FORMAT},
    region::{Country, Region},
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Notifications emitted while the Scout works.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoutEvent {
    /// A discovery run published its provisional catalog.
    CatalogPublished { country: Country, events: usize },

    /// Enrichment progress for a discovery run, 0.0 to 1.0.
    Progress { country: Country, progress: f32 },

    /// A discovery run finished and its catalog was persisted.
    DiscoveryCompleted {
        country: Country,
        report: EnrichmentReport,
    },

    /// A discovery run stopped without touching the catalog.
    DiscoveryFailed { country: Country, reason: String },

    /// A deep search appended companies to an event.
    DeepSearchCompleted { event_id: String, added: usize },

    /// A deep search found nothing new for an event.
    DeepSearchEmpty { event_id: String },
}

/// Summary of one discovery run.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryOutcome {
    pub country: Country,
    /// Events of the country after the run
    pub events: usize,
    /// Events that were not in the catalog before the run
    pub new_events: usize,
    pub enrichment: EnrichmentReport,
}

/// Summary of one deep search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepSearchOutcome {
    pub event_id: String,
    /// Companies returned by the backend
    pub found: usize,
    /// Companies appended after dedup
    pub added: usize,
}

/// Discovery and enrichment over a persisted catalog.
///
/// # Example
///
/// ```rust,ignore
/// let scout = Scout::open(store, backend, ScoutConfig::default()).await?;
///
/// // List and enrich the shows of one country
/// let outcome = scout.discover(Country::Singapore).await?;
///
/// // Widen one event's exhibitor list
/// scout.deep_search(&event_id).await?;
/// ```
pub struct Scout<S: KeyValueStore, B: SearchBackend> {
    store: S,
    gateway: SearchGateway<B>,
    catalog: RwLock<Catalog>,
    events: broadcast::Sender<ScoutEvent>,
    running_countries: Mutex<HashSet<Country>>,
    running_deep_searches: Mutex<HashSet<String>>,
}

impl<S: KeyValueStore, B: SearchBackend> Scout<S, B> {
    /// Open a scout over `store`, loading the catalog persisted there.
    ///
    /// A missing or corrupt catalog starts empty.
    pub async fn open(store: S, backend: B, config: ScoutConfig) -> Result<Self> {
        let catalog = load_catalog(&store, &config.store_key).await?;
        info!(events = catalog.len(), key = %config.store_key, "Loaded catalog");

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            store,
            gateway: SearchGateway::with_config(backend, config),
            catalog: RwLock::new(catalog),
            events,
            running_countries: Mutex::new(HashSet::new()),
            running_deep_searches: Mutex::new(HashSet::new()),
        })
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &ScoutConfig {
        self.gateway.config()
    }

    pub fn gateway(&self) -> &SearchGateway<B> {
        &self.gateway
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Subscribe to notifications. Late subscribers miss earlier events.
    pub fn subscribe(&self) -> broadcast::Receiver<ScoutEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the current catalog.
    pub async fn catalog(&self) -> Catalog {
        self.catalog.read().await.clone()
    }

    /// One event by id.
    pub async fn event(&self, event_id: &str) -> Option<Event> {
        self.catalog.read().await.get(event_id).cloned()
    }

    fn emit(&self, event: ScoutEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    /// Discover and enrich the events of `country`.
    ///
    /// Phase 1 replaces the country's events with the fresh list, persists
    /// and publishes it. Enrichment then fills events without companies, and
    /// Phase 2 writes the enriched list back and persists the catalog again.
    /// A failed or empty discovery leaves the catalog unchanged.
    pub async fn discover(&self, country: Country) -> Result<DiscoveryOutcome> {
        let _guard = RunGuard::acquire(&self.running_countries, country)
            .ok_or(ScoutError::RunInProgress { country })?;

        info!(%country, "Starting discovery run");
        let discovered = match self.gateway.discover(country).await {
            Ok(events) if events.is_empty() => Err(ScoutError::NoEventsFound { country }),
            other => other,
        };
        let discovered = match discovered {
            Ok(events) => events,
            Err(e) => {
                warn!(%country, error = %e, "Discovery run failed");
                self.emit(ScoutEvent::DiscoveryFailed {
                    country,
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        let config = self.config();

        // Phase 1
        let mut working_set = {
            let mut catalog = self.catalog.write().await;
            let merged = merge_provisional(&catalog, country, discovered);
            save_catalog(&self.store, &config.store_key, &merged.catalog).await?;
            *catalog = merged.catalog;
            merged.working_set
        };
        let new_events = working_set.iter().filter(|e| e.is_new).count();
        debug!(%country, new_events, "Persisted provisional catalog");
        self.emit(ScoutEvent::CatalogPublished {
            country,
            events: working_set.len(),
        });

        let enrichment = EnrichmentConfig::default()
            .with_workers(config.enrichment_workers)
            .with_progress_floor(config.shallow_progress_floor);
        let report = enrich_events(&mut working_set, &self.gateway, enrichment, |progress| {
            self.emit(ScoutEvent::Progress { country, progress })
        })
        .await;

        // Phase 2
        let events = working_set.len();
        {
            let mut catalog = self.catalog.write().await;
            let next = merge_final(&catalog, country, working_set);
            save_catalog(&self.store, &config.store_key, &next).await?;
            *catalog = next;
        }

        info!(%country, events, new_events, enriched = report.enriched, "Discovery run complete");
        self.emit(ScoutEvent::DiscoveryCompleted {
            country,
            report: report.clone(),
        });

        Ok(DiscoveryOutcome {
            country,
            events,
            new_events,
            enrichment: report,
        })
    }

    /// Discover every country of `region` in order.
    ///
    /// Countries run one after another; a failing country does not stop the
    /// others. Rejects regions without countries.
    pub async fn discover_region(
        &self,
        region: Region,
    ) -> Result<Vec<(Country, Result<DiscoveryOutcome>)>> {
        let countries = region.countries_checked()?;
        let mut outcomes = Vec::with_capacity(countries.len());
        for &country in countries {
            outcomes.push((country, self.discover(country).await));
        }
        Ok(outcomes)
    }

    // =========================================================================
    // Deep search
    // =========================================================================

    /// Widen the company list of one event.
    ///
    /// Companies whose name is already listed are skipped. The catalog is
    /// persisted only when something was appended.
    pub async fn deep_search(&self, event_id: &str) -> Result<DeepSearchOutcome> {
        let _guard = RunGuard::acquire(&self.running_deep_searches, event_id.to_string())
            .ok_or_else(|| ScoutError::DeepSearchInProgress {
                event_id: event_id.to_string(),
            })?;

        let event = self.event(event_id).await.ok_or_else(|| ScoutError::EventNotFound {
            event_id: event_id.to_string(),
        })?;

        info!(event_id, event = %event.name, "Starting deep search");
        let batch = self.gateway.deep(&event.name, event.venue, event.country).await;
        let found = batch.len();

        let added = if batch.is_empty() {
            0
        } else {
            let mut catalog = self.catalog.write().await;
            let mut next = catalog.clone();
            let target = next.get_mut(event_id).ok_or_else(|| ScoutError::EventNotFound {
                event_id: event_id.to_string(),
            })?;
            let added = append_new_companies(&mut target.companies, batch);
            if added > 0 {
                save_catalog(&self.store, &self.config().store_key, &next).await?;
                *catalog = next;
            }
            added
        };

        if added == 0 {
            info!(event_id, found, "Deep search found no new companies");
            self.emit(ScoutEvent::DeepSearchEmpty {
                event_id: event_id.to_string(),
            });
        } else {
            info!(event_id, found, added, "Deep search appended companies");
            self.emit(ScoutEvent::DeepSearchCompleted {
                event_id: event_id.to_string(),
                added,
            });
        }

        Ok(DeepSearchOutcome {
            event_id: event_id.to_string(),
            found,
            added,
        })
    }

    // =========================================================================
    // Outreach and export
    // =========================================================================

    /// Draft an outreach email for one event.
    pub async fn draft_email(
        &self,
        event_id: &str,
        instructions: Option<&str>,
    ) -> Result<EmailDraft> {
        let event = self.event(event_id).await.ok_or_else(|| ScoutError::EventNotFound {
            event_id: event_id.to_string(),
        })?;
        Ok(self
            .gateway
            .draft_email(&event.name, event.venue, event.country, instructions)
            .await)
    }

    /// Export rows for the whole catalog.
    pub async fn export_rows(&self) -> Vec<ExportRow> {
        export_rows(self.catalog.read().await.events())
    }

    /// The whole catalog as CSV text.
    pub async fn export_csv(&self) -> Result<String> {
        to_csv(&self.export_rows().await)
    }

    /// Find an event id by name, optionally pinned to a start date.
    ///
    /// Names compare case-insensitively after trimming.
    pub async fn find_event(&self, name: &str, date_start: Option<&str>) -> Option<String> {
        let needle = name.trim().to_lowercase();
        let catalog = self.catalog.read().await;
        let found = catalog
            .iter()
            .filter(|e| e.name.trim().to_lowercase() == needle)
            .find(|e| {
                date_start
                    .map(|d| e.date_start.format(DATE_FORMAT).to_string() == d.trim())
                    .unwrap_or(true)
            })
            .map(|e| e.id.clone());
        found
    }
}

/// Membership in a set of running keys, released on drop.
struct RunGuard<'a, K: Eq + Hash + Clone> {
    running: &'a Mutex<HashSet<K>>,
    key: K,
}

impl<'a, K: Eq + Hash + Clone> RunGuard<'a, K> {
    fn acquire(running: &'a Mutex<HashSet<K>>, key: K) -> Option<Self> {
        let inserted = running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());
        inserted.then_some(Self { running, key })
    }
}

impl<K: Eq + Hash + Clone> Drop for RunGuard<'_, K> {
    fn drop(&mut self) {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
