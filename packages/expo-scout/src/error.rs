//! Typed errors for the scout library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell a
//! failed discovery run apart from a missing credential.

use thiserror::Error;

use crate::types::region::{Country, Region};

/// Errors that can occur during scout operations.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// No API key available for the search backend
    #[error("missing backend credentials: {0}")]
    MissingCredentials(String),

    /// Search backend unavailable or failed
    #[error("search backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// List discovery failed, the whole run is aborted
    #[error("discovery failed for {country}: {reason}")]
    Discovery { country: Country, reason: String },

    /// List discovery succeeded but produced nothing usable
    #[error("no events found for {country}")]
    NoEventsFound { country: Country },

    /// A discovery run for this country is already in flight
    #[error("a discovery run for {country} is already in progress")]
    RunInProgress { country: Country },

    /// A deep search for this event is already in flight
    #[error("a deep search for event {event_id} is already in progress")]
    DeepSearchInProgress { event_id: String },

    /// Event id not present in the catalog
    #[error("event not found: {event_id}")]
    EventNotFound { event_id: String },

    /// Region has no countries assigned
    #[error("region {0} has no supported countries")]
    EmptyRegion(Region),

    /// Unrecognised country, venue or region name
    #[error("unknown {kind}: {value}")]
    UnknownName { kind: &'static str, value: String },

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Export rendering failed
    #[error("export error: {0}")]
    Export(#[from] csv::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for scout operations.
pub type Result<T> = std::result::Result<T, ScoutError>;
