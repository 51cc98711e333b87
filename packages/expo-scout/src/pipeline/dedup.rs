//! Append companies to an event without repeating names already present.

use std::collections::HashSet;

use crate::types::event::Company;

/// Append the companies of `batch` whose name is not already in `existing`.
///
/// Names compare case-insensitively against the list as it was before the
/// call. Entries within `batch` are not checked against each other, and
/// the order of `batch` is kept. Returns the number appended.
pub fn append_new_companies(existing: &mut Vec<Company>, batch: Vec<Company>) -> usize {
    let known: HashSet<String> = existing.iter().map(Company::dedup_key).collect();
    let before = existing.len();
    existing.extend(batch.into_iter().filter(|c| !known.contains(&c.dedup_key())));
    existing.len() - before
}
