//! JSON output sink.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::AppError;
use crate::models::Company;

/// Write records as a pretty-printed JSON array, creating parent
/// directories as needed.
pub fn write_records(records: &[Company], path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tracing::debug!("Creating parent directory for output: {}", parent.display());
            fs::create_dir_all(parent)?;
        }
    }

    let values: Vec<Value> = records.iter().map(ensure_serializable).collect();
    fs::write(path, serde_json::to_string_pretty(&values)?)?;

    tracing::info!("Saved {} records to {}", values.len(), path.display());
    Ok(())
}

/// A record that refuses to serialize is written as its debug text instead
/// of failing the whole run. The current field set cannot trigger this.
fn ensure_serializable(record: &Company) -> Value {
    serde_json::to_value(record).unwrap_or_else(|_| Value::String(format!("{record:?}")))
}
