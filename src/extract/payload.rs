//! Field coercion helpers for the upstream JSON payload.
//!
//! Upstream types drift between seasons (numbers sent as strings, integral
//! floats for ids), so each helper accepts the shapes a plain cast would.

use crate::error::{ExtractError, Result};
use serde_json::{Map, Value};

/// Key of the top-level asset list.
pub const ASSETS_KEY: &str = "players";

/// Splits the payload into its asset entries, in payload order.
pub fn asset_entries(body: &[u8]) -> Result<Vec<Value>, ExtractError> {
    let mut payload: Value =
        serde_json::from_slice(body).map_err(|e| ExtractError::Malformed(e.to_string()))?;

    match payload.get_mut(ASSETS_KEY).map(Value::take) {
        Some(Value::Array(entries)) => Ok(entries),
        Some(_) => Err(ExtractError::Malformed(format!(
            "'{}' is not a list",
            ASSETS_KEY
        ))),
        None => Err(ExtractError::Malformed(format!(
            "missing top-level '{}'",
            ASSETS_KEY
        ))),
    }
}

/// Borrows a required field of an asset object.
pub fn required<'a>(
    entry: &'a Map<String, Value>,
    index: usize,
    field: &str,
) -> Result<&'a Value, ExtractError> {
    match entry.get(field) {
        Some(Value::Null) | None => Err(ExtractError::missing_field(index, field)),
        Some(value) => Ok(value),
    }
}

/// Integer cast: integers, finite floats (truncated) and integer strings.
pub fn integer(value: &Value, index: usize, field: &str) -> Result<i64, ExtractError> {
    let coerced = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    coerced.ok_or_else(|| ExtractError::invalid_field(index, field, "integer"))
}

/// Float cast: numbers and numeric strings.
pub fn decimal(value: &Value, index: usize, field: &str) -> Result<f64, ExtractError> {
    let coerced = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    coerced.ok_or_else(|| ExtractError::invalid_field(index, field, "decimal"))
}

/// String cast: strings as-is, numbers rendered.
pub fn text(value: &Value, index: usize, field: &str) -> Result<String, ExtractError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ExtractError::invalid_field(index, field, "string")),
    }
}
