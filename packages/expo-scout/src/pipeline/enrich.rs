//! Enrichment scheduler: shallow-enrich fresh events with a small worker pool.
//!
//! Workers are futures joined on the calling task. They share one queue of
//! indexes into the working set; popping from it is a locked step, so each
//! event is handed to exactly one worker.

use futures::future::join_all;
use std::collections::VecDeque;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::gateway::SearchGateway;
use crate::traits::backend::SearchBackend;
use crate::types::event::Event;

/// Result of an enrichment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    /// Events seeded into the queue
    pub queued: usize,

    /// Events that received at least one company
    pub enriched: usize,

    /// Events left without companies (failed or empty lookups)
    pub left_empty: usize,
}

impl EnrichmentReport {
    /// Check if every queued event was enriched.
    pub fn is_complete(&self) -> bool {
        self.enriched == self.queued
    }
}

/// Configuration for enrichment passes.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentConfig {
    /// Number of concurrent workers
    pub workers: usize,

    /// Progress already accounted for before enrichment starts (0.0 to 1.0)
    pub progress_floor: f32,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            progress_floor: 0.2,
        }
    }
}

impl EnrichmentConfig {
    /// Set worker count. Zero is raised to one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the progress floor.
    pub fn with_progress_floor(mut self, floor: f32) -> Self {
        self.progress_floor = floor.clamp(0.0, 1.0);
        self
    }

    fn progress(&self, processed: usize, total: usize) -> f32 {
        if processed >= total {
            return 1.0;
        }
        self.progress_floor + (1.0 - self.progress_floor) * processed as f32 / total as f32
    }
}

struct Progress {
    processed: usize,
    enriched: usize,
}

/// Shallow-enrich every event of `events` that has no companies.
///
/// The queue is seeded once; an event that had companies at seed time is not
/// touched. A failed lookup leaves the event as it was. `on_progress` is
/// called after each processed event with a non-decreasing fraction.
pub async fn enrich_events<B, F>(
    events: &mut [Event],
    gateway: &SearchGateway<B>,
    config: EnrichmentConfig,
    on_progress: F,
) -> EnrichmentReport
where
    B: SearchBackend,
    F: Fn(f32) + Send + Sync,
{
    let seeded: VecDeque<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| e.companies.is_empty())
        .map(|(i, _)| i)
        .collect();
    let total = seeded.len();

    if total == 0 {
        debug!("No events need enrichment");
        on_progress(config.progress(0, 0));
        return EnrichmentReport::default();
    }

    let workers = config.workers.max(1).min(total);
    info!(queued = total, workers, "Starting enrichment");

    let queue = Mutex::new(seeded);
    let slots: Vec<Mutex<&mut Event>> = events.iter_mut().map(Mutex::new).collect();
    let progress = Mutex::new(Progress {
        processed: 0,
        enriched: 0,
    });

    let worker = |worker_id: usize| {
        let queue = &queue;
        let slots = &slots;
        let progress = &progress;
        let on_progress = &on_progress;
        async move {
            loop {
                let Some(index) = queue.lock().await.pop_front() else {
                    debug!(worker_id, "Queue drained, worker stopping");
                    break;
                };

                let lookup = {
                    let event = slots[index].lock().await;
                    event
                        .companies
                        .is_empty()
                        .then(|| (event.name.clone(), event.venue, event.country))
                };

                let mut found = false;
                if let Some((name, venue, country)) = lookup {
                    let companies = gateway.shallow(&name, venue, country).await;
                    if !companies.is_empty() {
                        debug!(worker_id, event = %name, count = companies.len(), "Enriched event");
                        slots[index].lock().await.companies = companies;
                        found = true;
                    }
                }

                let mut state = progress.lock().await;
                state.processed += 1;
                if found {
                    state.enriched += 1;
                }
                on_progress(config.progress(state.processed, total));
            }
        }
    };

    join_all((0..workers).map(worker)).await;

    let state = progress.into_inner();
    let report = EnrichmentReport {
        queued: total,
        enriched: state.enriched,
        left_empty: total - state.enriched,
    };
    info!(
        queued = report.queued,
        enriched = report.enriched,
        left_empty = report.left_empty,
        "Enrichment complete"
    );
    report
}
