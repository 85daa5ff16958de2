//! Identifier checks applied to relationship fields before they reach a write request.
//!
//! A reference field (a user's supervisor, a point of sale's promoter or partner) must hold
//! the canonical hyphenated UUID text of another record. Anything else coming from a form,
//! such as an unset selector's empty string, a numeric placeholder or a mock default, is
//! turned into `None` so the caller can leave the field out of the payload.

use serde_json::{Map, Value};
use uuid::Uuid;

/// Length of the `8-4-4-4-12` textual form.
const HYPHENATED_LEN: usize = 36;

/// Returns true if `candidate` is exactly a hyphenated UUID (hex digits in either case).
pub fn is_valid_uuid_str(candidate: &str) -> bool {
    // try_parse also takes the simple, braced and urn forms, none of which is 36 bytes long
    candidate.len() == HYPHENATED_LEN && Uuid::try_parse(candidate).is_ok()
}

/// Format check over an arbitrary JSON value. Only strings can pass.
pub fn is_valid_uuid(candidate: &Value) -> bool {
    match candidate {
        Value::String(s) => is_valid_uuid_str(s),
        _ => false,
    }
}

/// Returns the identifier unchanged when it passes the format check, `None` otherwise.
pub fn sanitize_uuid(candidate: &Value) -> Option<String> {
    match candidate {
        Value::String(s) => sanitize_uuid_str(s),
        _ => None,
    }
}

/// Same as [`sanitize_uuid`] for a field that may be missing altogether.
pub fn sanitize_uuid_opt(candidate: Option<&Value>) -> Option<String> {
    candidate.and_then(sanitize_uuid)
}

pub fn sanitize_uuid_str(candidate: &str) -> Option<String> {
    is_valid_uuid_str(candidate).then(|| candidate.to_string())
}

/// Applies [`sanitize_uuid`] to each named field of a write payload.
///
/// Valid values stay as they are, invalid ones are removed from the map so the backend keeps
/// whatever it already stores. Fields that are not named are never looked at. Returns the
/// names of the fields that were dropped.
pub fn sanitize_reference_fields(payload: &mut Map<String, Value>, fields: &[&str]) -> Vec<String> {
    let mut dropped = Vec::new();

    for &field in fields {
        let Some(value) = payload.get(field) else {
            continue;
        };

        match sanitize_uuid(value) {
            Some(id) => {
                payload.insert(field.to_string(), Value::String(id));
            }
            None => {
                tracing::debug!("Dropping malformed reference '{}': {}", field, value);
                payload.remove(field);
                dropped.push(field.to_string());
            }
        }
    }

    dropped
}
