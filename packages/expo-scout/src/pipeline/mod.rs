//! Discovery pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Provisional merge of a country's freshly listed events
//! - Shallow enrichment by a bounded worker pool
//! - Final merge and persistence
//! - Deep search with name-based dedup

pub mod dedup;
pub mod enrich;
pub mod merge;
pub mod scout;

pub use dedup::append_new_companies;
pub use enrich::{enrich_events, EnrichmentConfig, EnrichmentReport};
pub use merge::{merge_final, merge_provisional, ProvisionalMerge};
pub use scout::{DeepSearchOutcome, DiscoveryOutcome, Scout, ScoutEvent};
