use anyhow::{Context, Result};
use serde_json::Value;

use crate::cleaning::PlayerRow;

/// Transport-neutral record list, one JSON object per ranked row,
/// order preserved.
pub fn to_records(rows: &[PlayerRow]) -> Result<Vec<Value>> {
    rows.iter()
        .map(|row| serde_json::to_value(row).context("serialize player row"))
        .collect()
}

/// Pretty-printed JSON array of ranked rows, the response body shape
/// of the original service.
pub fn to_pretty_json(rows: &[PlayerRow]) -> Result<String> {
    serde_json::to_string_pretty(rows).context("serialize ranked players")
}
