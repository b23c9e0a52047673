//! Defensive parsing of raw upstream field values.
//!
//! Upstream rows arrive from a hosted database whose numeric columns are
//! sometimes text, sometimes null, sometimes garbage. Everything here degrades
//! to `None` ("signal absent") instead of failing.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::{Map, Value};

use super::vital_sign::BloodPressure;

static RE_BLOOD_PRESSURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*/\s*(\d+(?:\.\d+)?)\s*$").unwrap());

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// One upstream row as a JSON object. Non-object rows are treated as empty.
pub type RawRow = Map<String, Value>;

pub fn into_row(value: Value) -> RawRow {
    match value {
        Value::Object(row) => row,
        _ => RawRow::new(),
    }
}

/// First non-null value among `keys`, in the order given.
///
/// Upstream tables spell the same column several ways and some rows carry
/// more than one spelling, so callers list every accepted key by priority.
pub fn pick<'a>(row: &'a RawRow, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .find(|value| !value.is_null())
}

/// Parse a measurement that may be a JSON number or a numeric string.
/// Only finite, strictly positive values count as a measurement.
pub fn parse_measurement(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (number.is_finite() && number > 0.0).then_some(number)
}

/// Parse an upstream timestamp. Offsets are normalized to UTC; bare dates
/// resolve to midnight.
pub fn parse_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse `"systolic/diastolic"` text. Both halves must be valid measurements.
pub fn parse_blood_pressure_text(text: &str) -> Option<BloodPressure> {
    let caps = RE_BLOOD_PRESSURE.captures(text)?;
    let systolic = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let diastolic = caps.get(2)?.as_str().parse::<f64>().ok()?;
    BloodPressure::new(systolic, diastolic)
}

/// Borrow a JSON string value; any other JSON type is absent.
pub fn as_text(value: Option<&Value>) -> Option<&str> {
    match value? {
        Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Trimmed, non-empty text or `None`.
pub fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Accept a key that may be a JSON string or number (some tables use integer ids).
pub fn parse_key(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
