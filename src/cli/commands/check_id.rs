use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::validate::{is_valid_uuid, sanitize_uuid};

/// The argument is read as JSON when it parses (so `12345` or `null` test non-text input)
/// and as plain text otherwise
fn candidate(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub fn handle(value: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let candidate = candidate(&value);
    let valid = is_valid_uuid(&candidate);
    let sanitized = sanitize_uuid(&candidate);

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                "input": candidate,
                "valid": valid,
                "sanitized": sanitized,
            }))?);
        }
        OutputFormat::Text => match sanitized {
            Some(id) => println!("✓ {} is a valid id", id),
            None => println!("✗ {} is not a valid id; it would be left out of writes", candidate),
        },
    }
    Ok(())
}
