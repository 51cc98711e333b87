//! Configuration for the discovery and enrichment pipeline.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Default key under which the catalog blob is persisted.
pub const DEFAULT_STORE_KEY: &str = "expo_scout_catalog";

/// Default instructions for email drafting.
pub const DEFAULT_EMAIL_INSTRUCTIONS: &str =
    "ask about exhibiting opportunities and booth pricing";

/// Configuration for the scout pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// Number of concurrent shallow-enrichment workers.
    ///
    /// Default: 3.
    pub enrichment_workers: usize,

    /// Progress reported once list discovery is done.
    ///
    /// Enrichment fills the remainder. Default: 0.2.
    pub shallow_progress_floor: f32,

    /// First year of the discovery window.
    ///
    /// The window covers this year and the next. If None, the current UTC
    /// year is used at query time.
    pub reference_year: Option<i32>,

    /// Instructions used when an email draft request carries none.
    pub email_instructions: String,

    /// Key under which the catalog blob is stored.
    pub store_key: String,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            enrichment_workers: 3,
            shallow_progress_floor: 0.2,
            reference_year: None,
            email_instructions: DEFAULT_EMAIL_INSTRUCTIONS.to_string(),
            store_key: DEFAULT_STORE_KEY.to_string(),
        }
    }
}

impl ScoutConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker pool size. Zero is raised to one.
    pub fn with_enrichment_workers(mut self, workers: usize) -> Self {
        self.enrichment_workers = workers.max(1);
        self
    }

    /// Pin the discovery window to start at `year`.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Set the default email instructions.
    pub fn with_email_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.email_instructions = instructions.into();
        self
    }

    /// Set the store key.
    pub fn with_store_key(mut self, key: impl Into<String>) -> Self {
        self.store_key = key.into();
        self
    }

    /// The two calendar years discovery targets.
    pub fn discovery_window(&self) -> (i32, i32) {
        let year = self.reference_year.unwrap_or_else(|| Utc::now().year());
        (year, year + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScoutConfig::default();
        assert_eq!(config.enrichment_workers, 3);
        assert_eq!(config.store_key, DEFAULT_STORE_KEY);
    }

    #[test]
    fn test_discovery_window_is_two_years() {
        let config = ScoutConfig::new().with_reference_year(2026);
        assert_eq!(config.discovery_window(), (2026, 2027));
    }

    #[test]
    fn test_zero_workers_is_raised() {
        assert_eq!(ScoutConfig::new().with_enrichment_workers(0).enrichment_workers, 1);
    }
}
