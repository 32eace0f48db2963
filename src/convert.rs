//! Value parsing and type coercion rules shared by ingestion and the scrubber.
//!
//! - [`cast_value`] converts a single [`Value`] to a target [`DataType`]; nulls stay null.
//! - [`parse_datetime`] accepts ISO-8601/RFC 3339 timestamps plus a handful of common
//!   date-only and US-style layouts. Month-first wins for `a/b/yyyy`.
//! - [`parse_bool`] accepts `true/false/t/f/1/0/yes/no/y/n` in any case.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::{DataType, Value};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Parse a boolean literal.
pub fn parse_bool(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}

/// Parse a date or date-time string. Date-only inputs resolve to midnight; offsets are
/// normalized to UTC.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Convert `value` to `target`.
///
/// Nulls (including `NaN`) are preserved as [`Value::Null`] for every target. Floats convert to
/// integers by truncation toward zero. Strings are trimmed before parsing. Date-times only convert
/// to and from strings.
pub fn cast_value(value: &Value, target: DataType) -> Result<Value, String> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match target {
        DataType::Utf8 => Ok(match value {
            Value::Utf8(s) => Value::Utf8(s.clone()),
            other => Value::Utf8(other.to_string()),
        }),
        DataType::Int64 => match value {
            Value::Int64(v) => Ok(Value::Int64(*v)),
            Value::Float64(v) => float_to_i64(*v).map(Value::Int64),
            Value::Bool(v) => Ok(Value::Int64(i64::from(*v))),
            Value::Utf8(s) => s.trim().parse::<i64>().map(Value::Int64).map_err(|e| e.to_string()),
            Value::DateTime(_) => Err("datetime cannot be converted to int64".to_string()),
            Value::Null => Ok(Value::Null),
        },
        DataType::Float64 => match value {
            Value::Int64(v) => Ok(Value::Float64(*v as f64)),
            Value::Float64(v) => Ok(Value::Float64(*v)),
            Value::Bool(v) => Ok(Value::Float64(if *v { 1.0 } else { 0.0 })),
            Value::Utf8(s) => s.trim().parse::<f64>().map(Value::Float64).map_err(|e| e.to_string()),
            Value::DateTime(_) => Err("datetime cannot be converted to float64".to_string()),
            Value::Null => Ok(Value::Null),
        },
        DataType::Bool => match value {
            Value::Bool(v) => Ok(Value::Bool(*v)),
            Value::Int64(v) => Ok(Value::Bool(*v != 0)),
            Value::Float64(v) => Ok(Value::Bool(*v != 0.0)),
            Value::Utf8(s) => parse_bool(s).map(Value::Bool),
            Value::DateTime(_) => Err("datetime cannot be converted to bool".to_string()),
            Value::Null => Ok(Value::Null),
        },
        DataType::DateTime => match value {
            Value::DateTime(dt) => Ok(Value::DateTime(*dt)),
            Value::Utf8(s) => parse_datetime(s)
                .map(Value::DateTime)
                .ok_or_else(|| "unrecognized date/time format".to_string()),
            _ => Err(format!(
                "{} cannot be converted to datetime",
                value.data_type().map(|t| t.to_string()).unwrap_or_default()
            )),
        },
    }
}

fn float_to_i64(v: f64) -> Result<i64, String> {
    if !v.is_finite() {
        return Err("non-finite float cannot be converted to int64".to_string());
    }
    let t = v.trunc();
    if t < i64::MIN as f64 || t >= i64::MAX as f64 {
        return Err("float out of int64 range".to_string());
    }
    Ok(t as i64)
}
