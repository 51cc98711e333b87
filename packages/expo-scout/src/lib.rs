//! Trade-Show Discovery and Enrichment Library
//!
//! Finds upcoming trade shows by country through a generative search
//! backend, enriches each show with its organizer and exhibitors, and keeps
//! the result in a persisted catalog.
//!
//! # Usage
//!
//! ```rust,ignore
//! use expo_scout::{Country, MemoryStore, Scout, ScoutConfig};
//! use expo_scout::testing::MockBackend;
//!
//! let scout = Scout::open(MemoryStore::new(), MockBackend::new(), ScoutConfig::default()).await?;
//!
//! // List and shallow-enrich the shows of one country
//! let outcome = scout.discover(Country::Singapore).await?;
//!
//! // Widen the exhibitor list of one show
//! scout.deep_search(&event_id).await?;
//!
//! // Everything as CSV
//! let csv = scout.export_csv().await?;
//! ```
//!
//! # Modules
//!
//! - [`types`] - Regions, events, companies, the catalog and configuration
//! - [`traits`] - Backend and persistence seams
//! - [`gateway`] - Typed, error-tolerant backend operations
//! - [`pipeline`] - Merge, enrichment, dedup and the [`Scout`] orchestrator
//! - [`stores`] - Storage implementations (MemoryStore, FileStore, SqliteStore)
//! - [`ai`] - Backend implementations (OpenAISearch, RateLimitedBackend)
//! - [`export`] - Row and CSV export
//! - [`security`] - Credential handling
//! - [`testing`] - Mock backend and fixtures for testing

pub mod ai;
pub mod error;
pub mod export;
pub mod gateway;
pub mod pipeline;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{Result, ScoutError};
pub use traits::{
    backend::{SearchBackend, SearchKind, SearchRequest},
    store::{load_catalog, save_catalog, KeyValueStore},
};
pub use types::{
    catalog::Catalog,
    config::{ScoutConfig, DEFAULT_EMAIL_INSTRUCTIONS, DEFAULT_STORE_KEY},
    email::EmailDraft,
    event::{event_id, Company, CompanyRole, DiscoveredEvent, Event},
    region::{Country, Region, Venue},
};

pub use gateway::{match_venue, SearchGateway};

pub use pipeline::{
    append_new_companies, enrich_events, merge_final, merge_provisional, DeepSearchOutcome,
    DiscoveryOutcome, EnrichmentConfig, EnrichmentReport, ProvisionalMerge, Scout, ScoutEvent,
};

pub use export::{export_rows, to_csv, ExportRow};

// Re-export stores
pub use stores::{FileStore, MemoryStore};

#[cfg(feature = "sqlite")]
pub use stores::SqliteStore;

// Re-export backends
pub use ai::{RateLimitedBackend, SearchBackendExt};

#[cfg(feature = "openai")]
pub use ai::OpenAISearch;

pub use security::{BackendCredentials, SecretString};

// Re-export testing utilities
pub use testing::MockBackend;
