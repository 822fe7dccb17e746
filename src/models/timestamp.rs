//! Normalization of the raw timestamp shapes found in event documents.
//!
//! Documents written over time carry dates as RFC 3339 strings, naive
//! strings, es-AR display strings, `{seconds, nanoseconds}` wrapper objects
//! or bare epoch numbers. Everything is converted once, here, into a
//! `DateTime<FixedOffset>` in the operations time zone.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;

/// Epoch values below this are seconds, above are milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y, %H:%M:%S",
];

/// Convert any supported JSON value into a timestamp in `offset`.
/// Returns `None` for absent, null or unparseable values.
pub fn parse_value(v: &Value, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    match v {
        Value::String(s) => parse_str(s, offset),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                from_epoch(i, offset)
            } else {
                n.as_f64().and_then(|f| from_epoch(f as i64, offset))
            }
        }
        Value::Object(map) => {
            let secs = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_i64)
                .unwrap_or(0);
            let utc = DateTime::from_timestamp(secs, nanos.clamp(0, 999_999_999) as u32)?;
            Some(utc.with_timezone(&offset))
        }
        _ => None,
    }
}

pub fn parse_str(s: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.with_timezone(&offset));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(t, fmt) {
            return offset.from_local_datetime(&naive).single();
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(t, "%Y-%m-%d") {
        return offset.from_local_datetime(&d.and_hms_opt(0, 0, 0)?).single();
    }

    if let Ok(d) = NaiveDate::parse_from_str(t, "%d/%m/%Y") {
        return offset.from_local_datetime(&d.and_hms_opt(0, 0, 0)?).single();
    }

    None
}

fn from_epoch(raw: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let utc = if raw.abs() < MILLIS_THRESHOLD {
        DateTime::from_timestamp(raw, 0)?
    } else {
        DateTime::from_timestamp_millis(raw)?
    };
    Some(utc.with_timezone(&offset))
}

/// First parseable value among `keys` of a JSON object.
pub fn first_of(
    data: &serde_json::Map<String, Value>,
    keys: &[&str],
    offset: FixedOffset,
) -> Option<DateTime<FixedOffset>> {
    keys.iter()
        .filter_map(|k| data.get(*k))
        .find_map(|v| parse_value(v, offset))
}
