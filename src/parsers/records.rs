//! Field access on untyped conversation records.
//!
//! Records are kept as [`serde_json::Value`] so that unknown record types and shapes pass
//! through to the detail view untouched; these helpers pull out the few fields the core
//! needs without requiring any of them to be present.

use chrono::{DateTime, Utc};
use serde_json::Value;

const RECORD_TYPE_SUMMARY: &str = "summary";

/// Non-empty string field of a record
pub fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// The record's `type` field
pub fn record_type(record: &Value) -> Option<&str> {
    str_field(record, "type")
}

/// Whether the record is a session summary rather than a message
pub fn is_summary(record: &Value) -> bool {
    record_type(record) == Some(RECORD_TYPE_SUMMARY)
}

/// The record's own timestamp, if it has a usable one
pub fn record_timestamp(record: &Value) -> Option<DateTime<Utc>> {
    record.get("timestamp").and_then(parse_timestamp)
}

/// Accepts integers (Unix milliseconds) and RFC3339 strings; anything else is absent
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::String(s) => s.parse::<DateTime<Utc>>().ok(),
        _ => None,
    }
}
