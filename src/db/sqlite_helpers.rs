//! SQLite helper utilities for type conversion
//!
//! SQLite has no document or array types, so embedded lists are stored as JSON
//! text and timestamps as RFC 3339 strings.

use anyhow::{Result, anyhow};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

// ============================================================================
// JSON Helpers (stored as TEXT in SQLite)
// ============================================================================

/// Serialize any serializable value to a JSON string
#[inline]
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| anyhow!("JSON encode error: {}", e))
}

/// Deserialize a JSON string to a value
#[inline]
pub fn from_json<T: DeserializeOwned>(s: &str) -> Result<T> {
    serde_json::from_str(s).map_err(|e| anyhow!("JSON parse error: {}", e))
}

/// Deserialize a JSON array column; empty or NULL-ish text reads as an empty list
pub fn json_to_vec<T: DeserializeOwned>(s: &str) -> Result<Vec<T>> {
    match s.trim() {
        "" | "null" => Ok(Vec::new()),
        other => from_json(other),
    }
}

// ============================================================================
// Timestamp Helpers (stored as ISO8601 TEXT in SQLite)
// ============================================================================

/// Get current UTC timestamp as ISO8601 string for SQLite
#[inline]
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339()
}

// ============================================================================
// Error Helpers
// ============================================================================

/// If `err` is a UNIQUE constraint violation, return the offending column name.
///
/// SQLite reports these as `UNIQUE constraint failed: <table>.<column>`.
pub fn unique_violation_column(err: &sqlx::Error) -> Option<String> {
    let db_err = err.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }
    let message = db_err.message();
    let column = message
        .rsplit(':')
        .next()
        .map(str::trim)
        .and_then(|qualified| qualified.rsplit('.').next())
        .unwrap_or("value");
    Some(column.to_string())
}
