//! Testing utilities including a scripted search backend.
//!
//! These are useful for testing applications that use the scout library
//! without making real search calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::error::{Result, ScoutError};
use crate::traits::backend::{SearchBackend, SearchKind, SearchRequest};

type ErrorFactory = Arc<dyn Fn() -> ScoutError + Send + Sync>;

/// A scripted search backend for testing.
///
/// Replies are looked up by `(kind, subject)` first, then by `kind`. With
/// nothing scripted, discovery and deep enrichment answer `[]` and the other
/// kinds answer `{}`. Every call is recorded for assertions.
#[derive(Default, Clone)]
pub struct MockBackend {
    /// Replies by kind
    replies: Arc<Mutex<HashMap<SearchKind, String>>>,

    /// Replies by kind and subject
    subject_replies: Arc<Mutex<HashMap<(SearchKind, String), String>>>,

    /// Kinds that fail, with the error to raise
    failing_kinds: Arc<Mutex<HashMap<SearchKind, ErrorFactory>>>,

    /// Subjects that fail for a given kind
    failing_subjects: Arc<Mutex<HashSet<(SearchKind, String)>>>,

    /// Simulated network latency per call
    latency: Option<Duration>,

    /// Call tracking for assertions
    calls: Arc<Mutex<Vec<SearchRequest>>>,

    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a new mock backend with default behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to every request of `kind` with `text`.
    pub fn with_reply(self, kind: SearchKind, text: impl Into<String>) -> Self {
        lock(&self.replies).insert(kind, text.into());
        self
    }

    /// Reply to requests of `kind` about `subject` with `text`.
    pub fn with_reply_for(
        self,
        kind: SearchKind,
        subject: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        lock(&self.subject_replies).insert((kind, subject.into()), text.into());
        self
    }

    /// Fail every request of `kind` with a backend error.
    pub fn fail_kind(self, kind: SearchKind) -> Self {
        self.fail_with(kind, || {
            ScoutError::Backend(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Mock connection refused",
            )))
        })
    }

    /// Fail every request of `kind` with the error built by `make`.
    pub fn fail_with(
        self,
        kind: SearchKind,
        make: impl Fn() -> ScoutError + Send + Sync + 'static,
    ) -> Self {
        lock(&self.failing_kinds).insert(kind, Arc::new(make));
        self
    }

    /// Fail requests of `kind` about `subject`.
    pub fn fail_for(self, kind: SearchKind, subject: impl Into<String>) -> Self {
        lock(&self.failing_subjects).insert((kind, subject.into()));
        self
    }

    /// Delay every reply by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<SearchRequest> {
        lock(&self.calls).clone()
    }

    /// Number of calls of `kind` about `subject`.
    pub fn call_count(&self, kind: SearchKind, subject: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|r| r.kind == kind && r.subject == subject)
            .count()
    }

    /// Number of calls of `kind`.
    pub fn kind_count(&self, kind: SearchKind) -> usize {
        lock(&self.calls).iter().filter(|r| r.kind == kind).count()
    }

    /// Highest number of calls that were awaiting a reply at the same time.
    pub fn max_concurrency(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn reply_for(&self, request: &SearchRequest) -> Result<String> {
        let key = (request.kind, request.subject.clone());
        if lock(&self.failing_subjects).contains(&key) {
            return Err(ScoutError::Backend(
                format!("Mock failure for {}", request.subject).into(),
            ));
        }
        if let Some(make) = lock(&self.failing_kinds).get(&request.kind) {
            return Err(make());
        }
        if let Some(text) = lock(&self.subject_replies).get(&key) {
            return Ok(text.clone());
        }
        if let Some(text) = lock(&self.replies).get(&request.kind) {
            return Ok(text.clone());
        }
        Ok(match request.kind {
            SearchKind::Discovery | SearchKind::DeepEnrichment => "[]".to_string(),
            SearchKind::ShallowEnrichment | SearchKind::EmailDraft => "{}".to_string(),
        })
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    async fn search(&self, request: &SearchRequest) -> Result<String> {
        lock(&self.calls).push(request.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.reply_for(request)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builders for events and companies used across tests.
pub mod fixtures {
    use chrono::NaiveDate;

    use crate::types::event::{Company, CompanyRole, DiscoveredEvent, Event, DATE_FORMAT};
    use crate::types::region::Country;

    /// Parse a `YYYY-MM-DD` literal.
    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).expect("fixture dates are YYYY-MM-DD")
    }

    /// A discovery record at the country's first venue.
    pub fn discovered(name: &str, start: &str, country: Country) -> DiscoveredEvent {
        DiscoveredEvent {
            name: name.to_string(),
            date_start: date(start),
            date_end: date(start),
            venue: country.venues()[0],
            country,
            description: None,
        }
    }

    /// A catalog event without companies.
    pub fn event(name: &str, start: &str, country: Country) -> Event {
        Event::from_discovered(discovered(name, start, country), Vec::new(), false)
    }

    /// A catalog event with the given companies.
    pub fn event_with(name: &str, start: &str, country: Country, companies: Vec<Company>) -> Event {
        Event::from_discovered(discovered(name, start, country), companies, false)
    }

    /// An exhibitor without contact details.
    pub fn company(name: &str) -> Company {
        Company::new(name, CompanyRole::Exhibitor)
    }
}
