pub mod dashboard;
pub mod pdv_service;
pub mod user_service;

pub use dashboard::{load_dashboard, Dashboard};
pub use pdv_service::PdvService;
pub use user_service::UserService;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{AdminError, AdminResult};
use crate::filter::filter::validate_column;
use crate::validate::sanitize_reference_fields;

/// Fields the backend owns; never sent in a write
const SYSTEM_FIELDS: &[&str] = &["id", "created_at"];

pub(crate) fn parse_rows<T: DeserializeOwned>(rows: Vec<Value>) -> AdminResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(AdminError::from))
        .collect()
}

pub(crate) fn first_row<T: DeserializeOwned>(rows: Vec<Value>, missing: impl FnOnce() -> AdminError) -> AdminResult<T> {
    match rows.into_iter().next() {
        Some(row) => Ok(serde_json::from_value(row)?),
        None => Err(missing()),
    }
}

/// Strips a write payload down to what may be sent for `collection`: system fields go,
/// each reference field is sanitized on its own, and every key must be a plain column.
pub(crate) fn prepare_write(
    collection: &str,
    mut payload: Map<String, Value>,
    reference_fields: &[&str],
) -> AdminResult<Map<String, Value>> {
    for field in SYSTEM_FIELDS {
        payload.remove(*field);
    }

    for key in payload.keys() {
        validate_column(key)?;
    }

    let dropped = sanitize_reference_fields(&mut payload, reference_fields);
    if !dropped.is_empty() && crate::config::config().logging.log_dropped_references {
        tracing::warn!(
            "Left malformed references out of the '{}' write: {}",
            collection,
            dropped.join(", ")
        );
    }

    Ok(payload)
}

pub(crate) fn into_object(patch: Value) -> AdminResult<Map<String, Value>> {
    match patch {
        Value::Object(map) => Ok(map),
        _ => Err(AdminError::validation("Expected a JSON object")),
    }
}
