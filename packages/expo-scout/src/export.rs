//! Tabular export of the catalog.

use serde::Serialize;

use crate::error::{Result, ScoutError};
use crate::types::event::{Event, DATE_FORMAT};

/// Placeholder for company columns of an event without companies.
pub const NOT_AVAILABLE: &str = "N/A";

/// One exported row: an event paired with one of its companies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Event Name")]
    pub event_name: String,
    #[serde(rename = "Venue")]
    pub venue: String,
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "End Date")]
    pub end_date: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Company Name")]
    pub company_name: String,
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Contact")]
    pub contact: String,
}

/// Rows for `events`: one per company, or one placeholder row for an event
/// without companies.
pub fn export_rows(events: &[Event]) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    for event in events {
        let row = |company_name: &str, role: &str, email: &str, contact: &str| ExportRow {
            event_name: event.name.clone(),
            venue: event.venue.name().to_string(),
            start_date: event.date_start.format(DATE_FORMAT).to_string(),
            end_date: event.date_end.format(DATE_FORMAT).to_string(),
            country: event.country.name().to_string(),
            company_name: company_name.to_string(),
            role: role.to_string(),
            email: email.to_string(),
            contact: contact.to_string(),
        };

        if event.companies.is_empty() {
            rows.push(row(NOT_AVAILABLE, NOT_AVAILABLE, NOT_AVAILABLE, NOT_AVAILABLE));
            continue;
        }
        rows.extend(
            event
                .companies
                .iter()
                .map(|c| row(&c.name, c.role.label(), &c.email, &c.contact)),
        );
    }
    rows
}

/// Render rows as CSV with a header line.
pub fn to_csv(rows: &[ExportRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer.write_record([
            "Event Name",
            "Venue",
            "Start Date",
            "End Date",
            "Country",
            "Company Name",
            "Role",
            "Email",
            "Contact",
        ])?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, e);
        ScoutError::Export(csv::Error::from(io))
    })
}
