//! Backend replies at the gateway boundary.
//!
//! Every backend answer is turned into a [`BackendReply`] before any
//! operation looks at it. Each operation then decides per variant whether to
//! propagate or default.

use serde_json::Value;

use crate::error::{Result, ScoutError};

/// Outcome of one backend call.
#[derive(Debug)]
pub enum BackendReply<T> {
    /// The answer contained a JSON payload.
    Parsed(T),

    /// The backend answered, but not with anything we can read.
    Malformed(String),

    /// The call itself failed.
    Failed(ScoutError),
}

impl BackendReply<Value> {
    /// Classify a raw backend result.
    pub fn from_response(response: Result<String>) -> Self {
        match response {
            Ok(text) => match extract_json(&text) {
                Some(value) => BackendReply::Parsed(value),
                None => BackendReply::Malformed(preview(&text)),
            },
            Err(e) => BackendReply::Failed(e),
        }
    }
}

impl<T> BackendReply<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, BackendReply::Parsed(_))
    }
}

/// Pull a JSON value out of model output.
///
/// Tries the text as-is, then without surrounding markdown fences, then the
/// first complete JSON value starting at a `[` or `{` in the text. Arrays of
/// scalars are skipped there, since prose uses them as citation markers
/// (`[1]`).
pub fn extract_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    let unfenced = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```JSON")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    if let Ok(value) = serde_json::from_str(unfenced) {
        return Some(value);
    }

    first_embedded_value(unfenced)
}

fn first_embedded_value(text: &str) -> Option<Value> {
    text.char_indices()
        .filter(|(_, c)| matches!(c, '[' | '{'))
        .find_map(|(start, _)| {
            let value = serde_json::Deserializer::from_str(&text[start..])
                .into_iter::<Value>()
                .next()?
                .ok()?;
            is_payload(&value).then_some(value)
        })
}

fn is_payload(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => {
            items.is_empty() || items.iter().any(|v| v.is_object() || v.is_array())
        }
        _ => false,
    }
}

fn preview(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "empty response".to_string();
    }
    let cut: String = trimmed.chars().take(120).collect();
    if cut.len() < trimmed.len() {
        format!("unparseable response: {}...", cut)
    } else {
        format!("unparseable response: {}", cut)
    }
}
