//! Search backend trait for generative search operations.
//!
//! The backend is a black box: it takes a prompt and answers with text that
//! should contain JSON. Parsing, defaulting and error policy live in the
//! gateway, so an implementation only moves bytes.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;

/// The four query shapes the gateway sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    /// List discovery of events for one country
    Discovery,

    /// Organizer plus a few exhibitors for one event
    ShallowEnrichment,

    /// As many exhibitors and sponsors as can be found for one event
    DeepEnrichment,

    /// Outreach email for one event
    EmailDraft,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Discovery => "discovery",
            SearchKind::ShallowEnrichment => "shallow_enrichment",
            SearchKind::DeepEnrichment => "deep_enrichment",
            SearchKind::EmailDraft => "email_draft",
        }
    }

    /// Whether answering needs live web search.
    pub fn needs_web_search(&self) -> bool {
        !matches!(self, SearchKind::EmailDraft)
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured query for the backend.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub kind: SearchKind,

    /// What the query is about: a country name or an event name.
    pub subject: String,

    /// System instructions, including the expected JSON schema
    pub system: String,

    /// The user prompt
    pub prompt: String,
}

impl SearchRequest {
    pub fn new(kind: SearchKind, subject: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            system: String::new(),
            prompt: String::new(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

/// Generative search capability.
///
/// Implementations wrap a specific provider and return its raw text answer.
/// Calls are not cancelable once issued.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Send one request and return the raw response text.
    async fn search(&self, request: &SearchRequest) -> Result<String>;
}

#[async_trait]
impl<B: SearchBackend + ?Sized> SearchBackend for Arc<B> {
    async fn search(&self, request: &SearchRequest) -> Result<String> {
        (**self).search(request).await
    }
}

#[async_trait]
impl<B: SearchBackend + ?Sized> SearchBackend for Box<B> {
    async fn search(&self, request: &SearchRequest) -> Result<String> {
        (**self).search(request).await
    }
}
