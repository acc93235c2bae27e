// Terminal rendering of command results, using the HTTP API's envelope for --json
use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::ApiError;

/// The `{success, data}` body a handler would have returned
pub fn success_envelope<T: Serialize>(data: &T) -> anyhow::Result<Value> {
    Ok(json!({
        "success": true,
        "data": serde_json::to_value(data)?,
    }))
}

pub fn print_success<T: Serialize>(output_format: OutputFormat, summary: &str, data: &T) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&success_envelope(data)?)?),
        OutputFormat::Text => println!("✓ {}", summary),
    }
    Ok(())
}

/// Text rendering of an error: the message with its code, then one line per
/// field error in field order.
pub fn failure_lines(err: &ApiError) -> Vec<String> {
    let mut lines = vec![format!("✗ {} ({})", err.message(), err.error_code())];
    if let ApiError::ValidationError {
        field_errors: Some(fields),
        ..
    } = err
    {
        let mut fields: Vec<_> = fields.iter().collect();
        fields.sort();
        lines.extend(fields.into_iter().map(|(field, message)| format!("  {}: {}", field, message)));
    }
    lines
}

/// Print the failure and return it, so the process exits non-zero.
pub fn print_failure(output_format: OutputFormat, err: ApiError) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&err.to_json())?),
        OutputFormat::Text => {
            for line in failure_lines(&err) {
                eprintln!("{}", line);
            }
        }
    }
    Err(err.into())
}
