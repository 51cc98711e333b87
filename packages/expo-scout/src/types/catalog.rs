//! The catalog: every known event across all countries.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

use crate::error::Result;
use crate::types::event::Event;
use crate::types::region::Country;

/// The full collection of known events.
///
/// Holds at most one event per id, ordered by start date ascending. The
/// catalog is a plain value: writers build a new one and swap it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    events: Vec<Event>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from arbitrary events.
    ///
    /// Later duplicates of an id are dropped, then the result is sorted.
    pub fn from_events(events: Vec<Event>) -> Self {
        let mut seen = HashSet::new();
        let mut events: Vec<Event> = events
            .into_iter()
            .filter(|e| seen.insert(e.id.clone()))
            .collect();
        sort_by_start(&mut events);
        Self { events }
    }

    /// Decode a persisted blob. A blob that does not parse yields an empty catalog.
    pub fn from_blob(blob: &str) -> Self {
        match serde_json::from_str::<Vec<Event>>(blob) {
            Ok(events) => Self::from_events(events),
            Err(e) => {
                warn!(error = %e, "Persisted catalog is unreadable, starting empty");
                Self::new()
            }
        }
    }

    pub fn to_blob(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.events)?)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// New catalog with `country`'s events replaced wholesale by `fresh`.
    ///
    /// Other countries are kept, except entries whose id also appears in
    /// `fresh`: the fresh record wins so ids stay unique.
    pub fn replace_country(&self, country: Country, fresh: Vec<Event>) -> Self {
        let fresh_ids: HashSet<&str> = fresh.iter().map(|e| e.id.as_str()).collect();
        let mut events: Vec<Event> = self
            .events
            .iter()
            .filter(|e| e.country != country && !fresh_ids.contains(e.id.as_str()))
            .cloned()
            .collect();
        events.extend(fresh);
        Self::from_events(events)
    }
}

/// Stable sort by start date ascending.
pub fn sort_by_start(events: &mut [Event]) {
    events.sort_by_key(|e| e.date_start);
}
