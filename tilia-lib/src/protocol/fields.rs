//! Lenient accessors for loosely shaped JSON payloads.
//!
//! Every accessor returns `None` (or an empty list) for a missing key, an
//! explicit `null`, or a value of the wrong shape, so call sites spell out
//! their own fallback. Nothing here fails.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Look up `key`, treating `null` as absent.
pub fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

/// Read `key` as text.
///
/// Strings are returned as-is; numbers, booleans and nested JSON are rendered
/// to their JSON text.
pub fn string(value: &Value, key: &str) -> Option<String> {
    field(value, key).map(as_text)
}

/// Render any JSON value as text, without quoting strings.
pub fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read `key` as an integer. Accepts JSON numbers and numeric strings.
pub fn int(value: &Value, key: &str) -> Option<i64> {
    match field(value, key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read `key` as a boolean. Accepts JSON booleans and `"true"`/`"false"`.
pub fn boolean(value: &Value, key: &str) -> Option<bool> {
    match field(value, key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().to_lowercase().parse().ok(),
        _ => None,
    }
}

/// Read `key` as a timestamp.
///
/// Unparsable values are logged and treated as absent.
pub fn timestamp(value: &Value, key: &str) -> Option<DateTime<Utc>> {
    let raw = field(value, key)?;
    let parsed = match raw {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        _ => None,
    };
    if parsed.is_none() {
        tracing::warn!(field = key, value = %raw, "ignoring unparsable timestamp");
    }
    parsed
}

/// Parse the date formats the service has been seen to emit.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%m/%d/%Y %H:%M:%S",
    ] {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Read `key` as a collection.
///
/// The service sends some collections as arrays and others as objects keyed
/// by id; both yield their element values.
pub fn list<'a>(value: &'a Value, key: &str) -> Vec<&'a Value> {
    match field(value, key) {
        Some(v) => elements(v),
        None => Vec::new(),
    }
}

/// Element values of an array, or member values of an object.
pub fn elements(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        _ => Vec::new(),
    }
}

/// Read `key` as a list of strings. A bare string becomes a one-element list.
pub fn string_list(value: &Value, key: &str) -> Vec<String> {
    match field(value, key) {
        Some(Value::String(s)) => vec![s.clone()],
        Some(v) => elements(v).into_iter().map(as_text).collect(),
        None => Vec::new(),
    }
}
