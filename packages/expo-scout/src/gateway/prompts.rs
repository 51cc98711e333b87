//! Prompt templates and payload schemas for the search backend.
//!
//! Payload types describe what we ask the backend to return. Every field is
//! optional on the way in: the parser in [`super::parse`] decides what a
//! missing field means.

use schemars::{schema_for, JsonSchema};
use serde::Deserialize;

use crate::types::region::{Country, Venue};

/// One discovered event as the backend reports it.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EventRecord {
    /// Official event name
    pub name: Option<String>,
    /// First day, YYYY-MM-DD
    #[serde(alias = "start_date", alias = "dateStart")]
    pub start_date: Option<String>,
    /// Last day, YYYY-MM-DD
    #[serde(alias = "end_date", alias = "dateEnd")]
    pub end_date: Option<String>,
    /// Venue name as published by the organizer
    pub venue: Option<String>,
    /// One sentence about the event
    pub description: Option<String>,
}

/// A company with verify-or-empty contact fields.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CompanyRecord {
    pub name: Option<String>,
    /// Verified email address, or empty
    pub email: Option<String>,
    /// Verified phone number or contact page, or empty
    #[serde(alias = "phone")]
    pub contact: Option<String>,
    /// Organizer, Exhibitor or Partner/Sponsor
    pub role: Option<String>,
}

/// Shallow enrichment answer.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ShallowRecord {
    pub organizer: Option<CompanyRecord>,
    pub exhibitors: Option<Vec<CompanyRecord>>,
}

/// Email draft answer.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EmailRecord {
    pub subject: Option<String>,
    pub body: Option<String>,
}

const VERIFY_OR_EMPTY: &str = "Only fill an email or contact field when you can verify it \
from an authoritative source such as the organizer's official website or an official \
exhibitor directory. If you cannot verify it, leave the field as an empty string. \
Never guess or construct addresses.";

/// Render the JSON schema of `T` for inclusion in a system prompt.
fn schema_text<T: JsonSchema>() -> String {
    let schema = schema_for!(T);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

fn json_only(schema: &str) -> String {
    format!(
        "Respond with JSON only, no prose and no markdown, matching this JSON schema:\n{}",
        schema
    )
}

pub fn discovery_system() -> String {
    format!(
        "You are a trade show research assistant with web search. List only events whose \
venue and dates you have confirmed on an official source. Do not invent events.\n\n{}",
        json_only(&schema_text::<Vec<EventRecord>>())
    )
}

pub fn discovery_prompt(country: Country, venues: &[Venue], years: (i32, i32)) -> String {
    let venue_list = venues
        .iter()
        .map(|v| format!("- {}", v.name()))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Find trade shows and exhibitions taking place in {country} during {from} and {to}, \
held at one of these venues:\n{venue_list}\n\n\
Return a JSON array. Each item has name, startDate, endDate, venue and an optional \
description. Use YYYY-MM-DD dates.",
        country = country.name(),
        from = years.0,
        to = years.1,
    )
}

pub fn shallow_system() -> String {
    format!(
        "You are a trade show research assistant with web search. {}\n\n{}",
        VERIFY_OR_EMPTY,
        json_only(&schema_text::<ShallowRecord>())
    )
}

pub fn shallow_prompt(event_name: &str, venue: Venue, country: Country) -> String {
    format!(
        "For the trade show \"{event_name}\" at {venue}, {country}, find the organizer and \
2-3 major exhibitors or sponsors. Return an object with an \"organizer\" object and an \
\"exhibitors\" array; each entry has name, email and contact.",
        venue = venue.name(),
        country = country.name(),
    )
}

pub fn deep_system() -> String {
    format!(
        "You are a trade show research assistant with web search. Be exhaustive. {}\n\n{}",
        VERIFY_OR_EMPTY,
        json_only(&schema_text::<Vec<CompanyRecord>>())
    )
}

pub fn deep_prompt(event_name: &str, venue: Venue, country: Country) -> String {
    format!(
        "List as many exhibitors, sponsors and partners of the trade show \"{event_name}\" \
at {venue}, {country} as you can find, aiming for 20 to 50. Check exhibitor lists, floor \
plans and sponsor pages. Return a JSON array; each entry has name, email, contact and role \
(Organizer, Exhibitor or Partner/Sponsor).",
        venue = venue.name(),
        country = country.name(),
    )
}

pub fn email_system() -> String {
    format!(
        "You write concise, professional business outreach emails.\n\n{}",
        json_only(&schema_text::<EmailRecord>())
    )
}

pub fn email_prompt(event_name: &str, venue: Venue, country: Country, instructions: &str) -> String {
    format!(
        "Draft an email to the organizers of \"{event_name}\" at {venue}, {country}. \
The email should {instructions}. Return an object with subject and body.",
        venue = venue.name(),
        country = country.name(),
    )
}
