//! Terminal rendering.

use colored::Colorize;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use expo_scout::{
    Catalog, Country, DeepSearchOutcome, DiscoveryOutcome, EmailDraft, Event, Region, ScoutEvent,
};

/// Print scout notifications to stderr until the channel closes.
pub fn spawn_progress(mut notices: broadcast::Receiver<ScoutEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match notices.recv().await {
                Ok(ScoutEvent::CatalogPublished { country, events }) => {
                    eprintln!("{} {events} events listed for {country}", "→".cyan());
                }
                Ok(ScoutEvent::Progress { country, progress }) => {
                    eprintln!("  {country}: {:>3.0}%", progress * 100.0);
                }
                Ok(ScoutEvent::DiscoveryFailed { country, reason }) => {
                    eprintln!("{} {country}: {reason}", "✗".red());
                }
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}

pub fn print_discovery(outcome: &DiscoveryOutcome) {
    println!(
        "{} {}: {} events ({} new), {} of {} enriched",
        "✓".green(),
        outcome.country.to_string().bold(),
        outcome.events,
        outcome.new_events,
        outcome.enrichment.enriched,
        outcome.enrichment.queued,
    );
}

pub fn print_deep_outcome(outcome: &DeepSearchOutcome) {
    if outcome.added == 0 {
        println!("{}", "No new companies found".yellow());
    } else {
        println!(
            "{} Added {} of {} companies found",
            "✓".green(),
            outcome.added,
            outcome.found
        );
    }
}

pub fn print_catalog(catalog: &Catalog, country: Option<Country>) {
    let events: Vec<&Event> = catalog
        .iter()
        .filter(|e| country.map_or(true, |c| e.country == c))
        .collect();
    if events.is_empty() {
        println!("{}", "No events yet. Run `scout discover <country>`.".dimmed());
        return;
    }
    for event in events {
        let marker = if event.is_new { "NEW".green().bold() } else { "   ".normal() };
        println!(
            "{marker} {} {}  {} ({}, {}, {})  {} companies",
            event.date_start,
            event.name.bold(),
            event.id.dimmed(),
            event.venue,
            event.country,
            event.country.region().name(),
            event.companies.len()
        );
    }
}

pub fn print_event(event: &Event) {
    println!("{} ({} to {})", event.name.bold(), event.date_start, event.date_end);
    println!("  {}, {}", event.venue, event.country);
    for company in &event.companies {
        let email = if company.email.is_empty() {
            "-".dimmed().to_string()
        } else {
            company.email.clone()
        };
        println!("  {:<16} {} {}", company.role.label(), company.name, email);
    }
}

pub fn print_draft(draft: &EmailDraft) {
    println!("{} {}", "Subject:".bold(), draft.subject);
    println!();
    println!("{}", draft.body);
}

pub fn print_regions() {
    for region in Region::ALL {
        let countries = region.countries();
        if countries.is_empty() {
            println!("{} {}", region.name().bold(), "(no countries yet)".dimmed());
            continue;
        }
        println!("{}", region.name().bold());
        for country in countries {
            println!("  {}", country.name().cyan());
            for venue in country.venues() {
                println!("    {venue}");
            }
        }
    }
}
