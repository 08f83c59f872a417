//! Stateless single-value checks: JSONPath prefix, ISO-8601 timestamps, non-empty lists.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::error::{ErrorKind, ValidationError};
use crate::model::path::FieldPath;

const JSON_PATH_PREFIX: &str = "$.";
const JSON_PATH_KEY_SUFFIX: &str = ".$";

/// Accepts `null`. A string must start with `$.`. A mapping is walked recursively: keys
/// ending in `.$` must hold a JSONPath string, nested mappings are checked the same way.
/// Other values are not constrained.
pub fn check_json_path(value: &Value, path: &FieldPath) -> Result<(), ValidationError> {
    match value {
        Value::String(s) if !s.starts_with(JSON_PATH_PREFIX) => Err(ValidationError::new(
            ErrorKind::InvalidJsonPath,
            path,
            format!("\"{}\" must be a JSONPath and start with \"$.\"", s),
        )),
        Value::Object(map) => {
            for (key, nested) in map {
                let nested_path = path.key(key.as_str());
                if key.ends_with(JSON_PATH_KEY_SUFFIX) {
                    let is_path = nested
                        .as_str()
                        .is_some_and(|s| s.starts_with(JSON_PATH_PREFIX));
                    if !is_path {
                        return Err(ValidationError::new(
                            ErrorKind::InvalidJsonPath,
                            &nested_path,
                            format!(
                                "Key \"{}\" indicates its value will be a JSONPath, however its value {} is not a JSONPath",
                                key, nested
                            ),
                        ));
                    }
                } else if nested.is_object() {
                    check_json_path(nested, &nested_path)?;
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Requires a calendar date-time with a `T` separator at offset 10 and either a `Z`
/// suffix or an explicit `±HH:MM` / `±HHMM` offset.
pub fn check_iso8601(value: &str, path: &FieldPath) -> Result<(), ValidationError> {
    let fail = |message: String| Err(ValidationError::new(ErrorKind::InvalidTimestamp, path, message));

    if !parses_as_iso8601(value) {
        return fail(format!("Date-time string '{}' is not ISO-8601 compliant.", value));
    }
    if value.len() < 10 {
        return fail(format!(
            "Date-time string '{}' must indicate a date and a time.",
            value
        ));
    }
    if value.as_bytes().get(10) != Some(&b'T') {
        return fail(format!(
            "Date-time string '{}' must use 'T' to separate the date and time values.",
            value
        ));
    }
    if !value.ends_with('Z') && !has_explicit_offset(value) {
        return fail(format!(
            "Naive date-time string '{}' must end in Z",
            value
        ));
    }
    Ok(())
}

/// Accepts `None`. A present list must hold at least one item.
pub fn check_non_empty<T>(items: Option<&[T]>, path: &FieldPath) -> Result<(), ValidationError> {
    match items {
        Some([]) => Err(ValidationError::new(
            ErrorKind::EmptyList,
            path,
            "At least one item is required.",
        )),
        _ => Ok(()),
    }
}

fn parses_as_iso8601(value: &str) -> bool {
    const OFFSET_FORMATS: [&str; 6] = [
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M%z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%d %H:%M%z",
        "%Y-%m-%d %H:%M%:z",
    ];
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    if DateTime::parse_from_rfc3339(value).is_ok() {
        return true;
    }
    if OFFSET_FORMATS
        .iter()
        .any(|fmt| DateTime::parse_from_str(value, fmt).is_ok())
    {
        return true;
    }
    let naive = value.strip_suffix('Z').unwrap_or(value);
    NAIVE_FORMATS
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(naive, fmt).is_ok())
        || NaiveDate::parse_from_str(naive, "%Y-%m-%d").is_ok()
}

fn has_explicit_offset(value: &str) -> bool {
    let bytes = value.as_bytes();
    let sign_at = |from_end: usize| {
        bytes
            .len()
            .checked_sub(from_end)
            .is_some_and(|i| matches!(bytes[i], b'+' | b'-'))
    };
    let colon_at = |from_end: usize| {
        bytes
            .len()
            .checked_sub(from_end)
            .is_some_and(|i| bytes[i] == b':')
    };
    (sign_at(6) && colon_at(3)) || sign_at(5)
}
