use serde_json::Value;
use tracing::{debug, info};

use crate::contacts::{find_email, EmailTable, NOT_FOUND_SENTINEL};

use super::reporter::RelayError;

/// Attach an `email` to the first PI of every project in `response`.
///
/// Only `results` is modified; every other top-level field is returned as
/// received. Fails if `results` is missing or is not an array.
pub fn enrich_response(mut response: Value, table: &EmailTable) -> Result<Value, RelayError> {
    let results = response
        .get_mut("results")
        .and_then(Value::as_array_mut)
        .ok_or(RelayError::MissingResults)?;

    let mut matched = 0usize;
    for project in results.iter_mut() {
        if enrich_project(project, table) {
            matched += 1;
        }
    }

    info!(results = results.len(), matched, "Enriched project search results");
    Ok(response)
}

/// Set `email` on the project's first principal investigator.
///
/// Projects without investigators are left untouched. Returns whether an email
/// was found.
pub fn enrich_project(project: &mut Value, table: &EmailTable) -> bool {
    let Some(pi) = project
        .get_mut("principal_investigators")
        .and_then(Value::as_array_mut)
        .and_then(|pis| pis.first_mut())
        .and_then(Value::as_object_mut)
    else {
        return false;
    };

    let first = pi.get("first_name").and_then(Value::as_str).unwrap_or_default();
    let last = pi.get("last_name").and_then(Value::as_str).unwrap_or_default();

    let email = if first.trim().is_empty() && last.trim().is_empty() {
        None
    } else {
        find_email(table, first, last)
    };
    debug!(first, last, found = email.is_some(), "PI email lookup");

    let found = email.is_some();
    pi.insert(
        "email".to_string(),
        Value::String(email.unwrap_or_else(|| NOT_FOUND_SENTINEL.to_string())),
    );
    found
}
