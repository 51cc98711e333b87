//! Events, companies and event identity.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::region::{Country, Venue};

/// Date format used for identity and for the persisted catalog.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stable identity of an event.
///
/// Derived from the trimmed, lowercased name and the start date. The date
/// suffix has a fixed width, so distinct `(name, date)` pairs never share an
/// encoding.
pub fn event_id(name: &str, date_start: NaiveDate) -> String {
    let key = format!(
        "{}-{}",
        name.trim().to_lowercase(),
        date_start.format(DATE_FORMAT)
    );
    URL_SAFE_NO_PAD.encode(key.as_bytes())
}

/// Role a company plays at an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompanyRole {
    Organizer,
    #[default]
    Exhibitor,
    #[serde(rename = "Partner/Sponsor")]
    PartnerSponsor,
}

impl CompanyRole {
    pub fn label(&self) -> &'static str {
        match self {
            CompanyRole::Organizer => "Organizer",
            CompanyRole::Exhibitor => "Exhibitor",
            CompanyRole::PartnerSponsor => "Partner/Sponsor",
        }
    }

    /// Map free-text role from the backend. Unrecognised text is an exhibitor.
    pub fn from_text(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("organi") {
            CompanyRole::Organizer
        } else if text.contains("sponsor") || text.contains("partner") {
            CompanyRole::PartnerSponsor
        } else {
            CompanyRole::Exhibitor
        }
    }
}

impl fmt::Display for CompanyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An organizer, exhibitor, sponsor or partner of an event.
///
/// An empty `email` means the address was looked for and could not be
/// verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub role: CompanyRole,
}

impl Company {
    pub fn new(name: impl Into<String>, role: CompanyRole) -> Self {
        Self {
            name: name.into(),
            email: String::new(),
            contact: String::new(),
            role,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    /// Key used for deduplication: the lowercased name.
    pub fn dedup_key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// An event as returned by list discovery, before identity and merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredEvent {
    pub name: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub venue: Venue,
    pub country: Country,
    pub description: Option<String>,
}

impl DiscoveredEvent {
    pub fn id(&self) -> String {
        event_id(&self.name, self.date_start)
    }
}

/// One discovered trade show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub venue: Venue,
    pub country: Country,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub is_new: bool,
}

impl Event {
    /// Build an event from a discovery record with the given baseline companies.
    pub fn from_discovered(
        discovered: DiscoveredEvent,
        companies: Vec<Company>,
        is_new: bool,
    ) -> Self {
        Self {
            id: discovered.id(),
            name: discovered.name,
            date_start: discovered.date_start,
            date_end: discovered.date_end,
            venue: discovered.venue,
            country: discovered.country,
            description: discovered.description,
            companies,
            is_new,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_id_normalizes_name() {
        let a = event_id("  FoodTech Asia ", date("2026-03-10"));
        let b = event_id("foodtech asia", date("2026-03-10"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_id_differs_by_date() {
        let a = event_id("FoodTech Asia", date("2026-03-10"));
        let b = event_id("FoodTech Asia", date("2026-03-11"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_is_text_safe() {
        let id = event_id("Messe Düsseldorf / Café & Bar", date("2026-01-01"));
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_role_from_text() {
        assert_eq!(CompanyRole::from_text("Event Organiser"), CompanyRole::Organizer);
        assert_eq!(CompanyRole::from_text("Gold Sponsor"), CompanyRole::PartnerSponsor);
        assert_eq!(CompanyRole::from_text("Media Partner"), CompanyRole::PartnerSponsor);
        assert_eq!(CompanyRole::from_text("booth 12"), CompanyRole::Exhibitor);
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = Event::from_discovered(
            DiscoveredEvent {
                name: "Pack Expo".into(),
                date_start: date("2026-05-01"),
                date_end: date("2026-05-03"),
                venue: Venue::BitecBangna,
                country: Country::Thailand,
                description: None,
            },
            vec![Company::new("Acme", CompanyRole::PartnerSponsor)],
            true,
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["dateStart"], "2026-05-01");
        assert_eq!(json["isNew"], true);
        assert_eq!(json["venue"], "BITEC Bangna");
        assert_eq!(json["companies"][0]["role"], "Partner/Sponsor");
        assert!(json.get("description").is_none());
    }

    proptest! {
        #[test]
        fn prop_id_is_deterministic(name in ".{0,40}", days in 0i64..20_000) {
            let start = date("1990-01-01") + chrono::Duration::days(days);
            prop_assert_eq!(event_id(&name, start), event_id(&name, start));
        }

        #[test]
        fn prop_distinct_pairs_yield_distinct_ids(
            a in "[a-z ]{1,20}",
            b in "[a-z ]{1,20}",
            d1 in 0i64..5_000,
            d2 in 0i64..5_000,
        ) {
            let base = date("2000-01-01");
            let same = a.trim() == b.trim() && d1 == d2;
            let id_a = event_id(&a, base + chrono::Duration::days(d1));
            let id_b = event_id(&b, base + chrono::Duration::days(d2));
            prop_assert_eq!(same, id_a == id_b);
        }
    }
}
