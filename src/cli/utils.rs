use std::io::Write;

use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::AdminError;

/// Output a success message in the appropriate format
pub fn output_success(
    out: &mut impl Write,
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(body)) = (data, response.as_object_mut()) {
                body.extend(extra);
            }

            writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "✓ {}", message)?;
        }
    }
    Ok(())
}

/// Output an error in the appropriate format
pub fn output_error(output_format: &OutputFormat, error: &AdminError) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&error.to_json())?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", error);
            if let AdminError::Validation { field_errors: Some(fields), .. } = error {
                for (field, problem) in fields {
                    eprintln!("  {}: {}", field, problem);
                }
            }
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    out: &mut impl Write,
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "{}", message)?;
        }
    }
    Ok(())
}

/// Output a list of records, one line each in text mode
pub fn output_records<T: Serialize>(
    out: &mut impl Write,
    output_format: &OutputFormat,
    collection_name: &str,
    records: &[T],
    line: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&json!({
                collection_name: records
            }))?)?;
        }
        OutputFormat::Text => {
            for record in records {
                writeln!(out, "{}", line(record))?;
            }
            writeln!(out, "{} {}", records.len(), collection_name)?;
        }
    }
    Ok(())
}

/// Output one record: pretty JSON in either format, under a key in JSON mode
pub fn output_record<T: Serialize>(
    out: &mut impl Write,
    output_format: &OutputFormat,
    item_type: &str,
    record: &T,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&json!({ item_type: record }))?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "{}", serde_json::to_string_pretty(record)?)?;
        }
    }
    Ok(())
}

/// Text for an optional column
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
