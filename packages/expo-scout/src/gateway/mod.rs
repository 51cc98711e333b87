//! Search gateway: the four backend operations with their error policy.
//!
//! | Operation  | Backend failure      | Wrong-shape payload |
//! |------------|----------------------|---------------------|
//! | discover   | propagated           | empty list          |
//! | shallow    | empty list           | empty list          |
//! | deep       | empty list           | empty list          |
//! | draft      | fallback template    | fallback template   |

pub mod parse;
pub mod prompts;
pub mod reply;

use tracing::{debug, info, warn};

use crate::error::{Result, ScoutError};
use crate::traits::backend::{SearchBackend, SearchKind, SearchRequest};
use crate::types::{
    config::ScoutConfig,
    email::EmailDraft,
    event::{Company, DiscoveredEvent},
    region::{Country, Venue},
};

pub use parse::match_venue;
pub use reply::{extract_json, BackendReply};

/// Wraps a [`SearchBackend`] behind typed, error-tolerant operations.
pub struct SearchGateway<B: SearchBackend> {
    backend: B,
    config: ScoutConfig,
}

impl<B: SearchBackend> SearchGateway<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, ScoutConfig::default())
    }

    pub fn with_config(backend: B, config: ScoutConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    async fn ask(&self, request: SearchRequest) -> BackendReply<serde_json::Value> {
        debug!(kind = %request.kind, subject = %request.subject, "Querying search backend");
        BackendReply::from_response(self.backend.search(&request).await)
    }

    /// List the events of `country` in the discovery window.
    ///
    /// Backend failures abort with an error. A payload that is not an array
    /// yields an empty list.
    pub async fn discover(&self, country: Country) -> Result<Vec<DiscoveredEvent>> {
        let venues = country.venues();
        let request = SearchRequest::new(SearchKind::Discovery, country.name())
            .with_system(prompts::discovery_system())
            .with_prompt(prompts::discovery_prompt(
                country,
                &venues,
                self.config.discovery_window(),
            ));

        match self.ask(request).await {
            BackendReply::Parsed(payload) => {
                let events = parse::discovered_events(country, payload);
                info!(%country, count = events.len(), "Discovery returned events");
                Ok(events)
            }
            BackendReply::Malformed(reason) => {
                warn!(%country, %reason, "Discovery payload unreadable");
                Ok(Vec::new())
            }
            BackendReply::Failed(e @ ScoutError::MissingCredentials(_)) => Err(e),
            BackendReply::Failed(e) => Err(ScoutError::Discovery {
                country,
                reason: e.to_string(),
            }),
        }
    }

    /// Organizer plus a few exhibitors for one event. Never fails.
    pub async fn shallow(&self, event_name: &str, venue: Venue, country: Country) -> Vec<Company> {
        let request = SearchRequest::new(SearchKind::ShallowEnrichment, event_name)
            .with_system(prompts::shallow_system())
            .with_prompt(prompts::shallow_prompt(event_name, venue, country));

        match self.ask(request).await {
            BackendReply::Parsed(payload) => parse::shallow_companies(payload),
            BackendReply::Malformed(reason) => {
                warn!(event = event_name, %reason, "Shallow enrichment unreadable");
                Vec::new()
            }
            BackendReply::Failed(e) => {
                warn!(event = event_name, error = %e, "Shallow enrichment failed");
                Vec::new()
            }
        }
    }

    /// Broad exhibitor and sponsor search for one event. Never fails.
    pub async fn deep(&self, event_name: &str, venue: Venue, country: Country) -> Vec<Company> {
        let request = SearchRequest::new(SearchKind::DeepEnrichment, event_name)
            .with_system(prompts::deep_system())
            .with_prompt(prompts::deep_prompt(event_name, venue, country));

        match self.ask(request).await {
            BackendReply::Parsed(payload) => {
                let companies = parse::deep_companies(payload);
                info!(event = event_name, count = companies.len(), "Deep enrichment returned");
                companies
            }
            BackendReply::Malformed(reason) => {
                warn!(event = event_name, %reason, "Deep enrichment unreadable");
                Vec::new()
            }
            BackendReply::Failed(e) => {
                warn!(event = event_name, error = %e, "Deep enrichment failed");
                Vec::new()
            }
        }
    }

    /// Draft an outreach email. Falls back to a template on any failure.
    pub async fn draft_email(
        &self,
        event_name: &str,
        venue: Venue,
        country: Country,
        instructions: Option<&str>,
    ) -> EmailDraft {
        let instructions = instructions
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.config.email_instructions.as_str());
        let request = SearchRequest::new(SearchKind::EmailDraft, event_name)
            .with_system(prompts::email_system())
            .with_prompt(prompts::email_prompt(event_name, venue, country, instructions));

        let draft = match self.ask(request).await {
            BackendReply::Parsed(payload) => parse::email_draft(payload),
            BackendReply::Malformed(reason) => {
                warn!(event = event_name, %reason, "Email draft unreadable");
                None
            }
            BackendReply::Failed(e) => {
                warn!(event = event_name, error = %e, "Email draft failed");
                None
            }
        };

        draft.unwrap_or_else(|| EmailDraft::fallback(event_name))
    }
}
