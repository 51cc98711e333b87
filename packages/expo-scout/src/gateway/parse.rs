//! Lenient mapping from backend payloads to domain records.
//!
//! Nothing here fails: wrong shapes become empty collections and
//! individual bad records are skipped or defaulted.

use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::gateway::prompts::{CompanyRecord, EmailRecord, EventRecord, ShallowRecord};
use crate::types::email::EmailDraft;
use crate::types::event::{Company, CompanyRole, DiscoveredEvent, DATE_FORMAT};
use crate::types::region::{Country, Venue};

/// Map free-text venue back to a canonical venue of `country`.
///
/// Walks the country's venues in enumeration order and picks the first whose
/// canonical first word occurs in `text`, case-insensitively. With no match
/// the country's first venue is used. Venues sharing a first word (the
/// German "Messe" venues) therefore always resolve to the earliest one.
pub fn match_venue(country: Country, text: &str) -> Venue {
    let haystack = text.to_lowercase();
    let venues = country.venues();
    venues
        .iter()
        .copied()
        .find(|v| haystack.contains(&v.first_word().to_lowercase()))
        .or_else(|| venues.first().copied())
        .unwrap_or(Venue::ALL[0])
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.date_naive());
    }
    text.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
}

/// Discovery payload to partial events. A non-array payload is empty.
pub fn discovered_events(country: Country, payload: Value) -> Vec<DiscoveredEvent> {
    let Value::Array(items) = payload else {
        warn!(%country, "Discovery payload is not an array, treating as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| {
            let record: EventRecord = from_value_or_skip(item)?;
            discovered_event(country, record)
        })
        .collect()
}

fn discovered_event(country: Country, record: EventRecord) -> Option<DiscoveredEvent> {
    let name = non_empty(record.name)?;
    let Some(date_start) = record.start_date.as_deref().and_then(parse_date) else {
        warn!(%country, event = %name, "Skipping event without a readable start date");
        return None;
    };
    let date_end = record
        .end_date
        .as_deref()
        .and_then(parse_date)
        .unwrap_or(date_start);
    let venue = match_venue(country, record.venue.as_deref().unwrap_or_default());

    Some(DiscoveredEvent {
        name,
        date_start,
        date_end,
        venue,
        country,
        description: non_empty(record.description),
    })
}

/// Shallow payload to companies: organizer first, then exhibitors.
///
/// The organizer is kept only when named; exhibitor entries are kept even
/// without a name.
pub fn shallow_companies(payload: Value) -> Vec<Company> {
    if !payload.is_object() {
        debug!("Shallow payload is not an object, treating as empty");
        return Vec::new();
    }
    let mut payload = payload;
    let exhibitors = payload
        .get_mut("exhibitors")
        .map(Value::take)
        .unwrap_or(Value::Null);
    let record: ShallowRecord = from_value_or_skip(payload).unwrap_or_default();

    let mut companies = Vec::new();
    if let Some(organizer) = record.organizer {
        if organizer.name.as_deref().is_some_and(|n| !n.trim().is_empty()) {
            companies.push(company(organizer, CompanyRole::Organizer));
        }
    }
    companies.extend(
        company_records(exhibitors)
            .into_iter()
            .map(|r| company(r, CompanyRole::Exhibitor)),
    );
    companies
}

/// Deep payload to companies. Entries need a name; role defaults to exhibitor.
pub fn deep_companies(payload: Value) -> Vec<Company> {
    if !payload.is_array() {
        debug!("Deep payload is not an array, treating as empty");
        return Vec::new();
    }
    company_records(payload)
        .into_iter()
        .filter(|r| r.name.as_deref().is_some_and(|n| !n.trim().is_empty()))
        .map(|r| {
            let role = r
                .role
                .as_deref()
                .map(CompanyRole::from_text)
                .unwrap_or_default();
            company(r, role)
        })
        .collect()
}

/// Email payload to a draft, if it carries both parts.
pub fn email_draft(payload: Value) -> Option<EmailDraft> {
    let record: EmailRecord = from_value_or_skip(payload)?;
    let draft = EmailDraft {
        subject: non_empty(record.subject)?,
        body: non_empty(record.body)?,
    };
    Some(draft)
}

/// Array entries as company records. Bare strings are taken as names.
fn company_records(value: Value) -> Vec<CompanyRecord> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(CompanyRecord {
                name: Some(name),
                ..Default::default()
            }),
            other => from_value_or_skip(other),
        })
        .collect()
}

fn company(record: CompanyRecord, role: CompanyRole) -> Company {
    Company {
        name: record.name.unwrap_or_default().trim().to_string(),
        email: record.email.unwrap_or_default().trim().to_string(),
        contact: record.contact.unwrap_or_default().trim().to_string(),
        role,
    }
}

fn from_value_or_skip<T: DeserializeOwned>(value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!(error = %e, "Skipping malformed record");
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_venue_by_first_word() {
        assert_eq!(
            match_venue(Country::Thailand, "BITEC Bangna Hall 5"),
            Venue::BitecBangna
        );
        assert_eq!(
            match_venue(Country::Thailand, "IMPACT Challenger Hall"),
            Venue::ImpactArena
        );
    }

    #[test]
    fn test_match_venue_defaults_to_first() {
        assert_eq!(match_venue(Country::Thailand, "Somewhere else"), Venue::ImpactArena);
        assert_eq!(match_venue(Country::Thailand, ""), Venue::ImpactArena);
    }

    #[test]
    fn test_match_venue_keeps_first_word_ambiguity() {
        // Every German venue starts with "Messe"; enumeration order decides.
        assert_eq!(
            match_venue(Country::Germany, "Messe Munich, Hall B2"),
            Venue::MesseFrankfurt
        );
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 4);
        assert_eq!(parse_date("2026-03-04"), expected);
        assert_eq!(parse_date("2026-03-04T09:00:00+07:00"), expected);
        assert_eq!(parse_date("2026-03-04 (tentative)"), expected);
        assert_eq!(parse_date("March 2026"), None);
    }

    #[test]
    fn test_discovered_events_skips_bad_records() {
        let payload = json!([
            {"name": "ProPak Asia", "startDate": "2026-06-10", "endDate": "2026-06-13",
             "venue": "BITEC Bangna", "description": "Processing and packaging"},
            {"name": "No Date"},
            {"name": "  ", "startDate": "2026-01-01"},
            "not an object",
            {"name": "Open Ended", "start_date": "2026-09-01", "venue": "Unknown Hall"}
        ]);

        let events = discovered_events(Country::Thailand, payload);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].venue, Venue::BitecBangna);
        assert_eq!(events[0].description.as_deref(), Some("Processing and packaging"));
        assert_eq!(events[1].date_end, events[1].date_start);
        assert_eq!(events[1].venue, Venue::ImpactArena);
    }

    #[test]
    fn test_discovered_events_non_array_is_empty() {
        assert!(discovered_events(Country::Singapore, json!({"events": []})).is_empty());
    }

    #[test]
    fn test_shallow_companies() {
        let payload = json!({
            "organizer": {"name": "Informa Markets", "email": "info@informa.com", "contact": ""},
            "exhibitors": [{"name": "Tetra Pak"}, {"email": "x@y.com"}, "Bosch"]
        });
        let companies = shallow_companies(payload);

        assert_eq!(companies.len(), 4);
        assert_eq!(companies[0].role, CompanyRole::Organizer);
        assert_eq!(companies[0].email, "info@informa.com");
        assert_eq!(companies[1].role, CompanyRole::Exhibitor);
        assert_eq!(companies[2].name, "");
        assert_eq!(companies[3].name, "Bosch");
    }

    #[test]
    fn test_shallow_skips_unnamed_organizer() {
        let companies = shallow_companies(json!({"organizer": {"name": ""}, "exhibitors": []}));
        assert!(companies.is_empty());
        assert!(shallow_companies(json!([1, 2])).is_empty());
    }

    #[test]
    fn test_deep_companies_defaults() {
        let payload = json!([
            {"name": "Acme"},
            {"name": "Beta", "email": "sales@beta.io", "role": "Gold Sponsor"},
            {"email": "anon@nowhere"},
            {"name": "Gamma", "role": "Organiser"}
        ]);
        let companies = deep_companies(payload);

        assert_eq!(companies.len(), 3);
        assert_eq!(companies[0].role, CompanyRole::Exhibitor);
        assert_eq!(companies[0].email, "");
        assert_eq!(companies[1].role, CompanyRole::PartnerSponsor);
        assert_eq!(companies[2].role, CompanyRole::Organizer);
        assert!(deep_companies(json!({"companies": []})).is_empty());
    }

    #[test]
    fn test_email_draft_requires_both_parts() {
        assert!(email_draft(json!({"subject": "Hi", "body": "Hello"})).is_some());
        assert!(email_draft(json!({"subject": "Hi", "body": ""})).is_none());
        assert!(email_draft(json!("text")).is_none());
    }
}
