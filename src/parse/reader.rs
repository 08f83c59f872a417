//! Strict object reader: the field-level pass.
//!
//! Every field a builder reads is marked as seen; whatever remains when the reader is
//! finished is an `UnexpectedField`. Field errors are collected, never short-circuited,
//! so one pass reports every bad field of an object.

use std::collections::HashSet;

use serde_json::{Map, Number, Value};

use crate::error::{ErrorKind, ValidationError};
use crate::model::path::FieldPath;
use crate::model::presence::Presence;
use crate::validate::primitives::{check_iso8601, check_json_path, check_non_empty};

pub(crate) type Built<T> = Result<T, Vec<ValidationError>>;

pub(crate) struct ObjectReader<'a> {
    object: &'a Map<String, Value>,
    path: FieldPath,
    seen: HashSet<String>,
    errors: Vec<ValidationError>,
}

impl<'a> ObjectReader<'a> {
    pub fn new(value: &'a Value, path: &FieldPath) -> Built<Self> {
        match value {
            Value::Object(object) => Ok(ObjectReader {
                object,
                path: path.clone(),
                seen: HashSet::new(),
                errors: Vec::new(),
            }),
            other => Err(vec![ValidationError::invalid_type(
                path,
                &format!("an object, found {}", json_type(other)),
            )]),
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn has_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.object.contains_key(*key))
    }

    /// Read a key without converting it.
    pub fn take(&mut self, key: &str) -> Option<&'a Value> {
        let object: &'a Map<String, Value> = self.object;
        let value = object.get(key)?;
        self.seen.insert(key.to_owned());
        Some(value)
    }

    /// Optional field; explicit `null` is kept as `Presence::Null`.
    pub fn optional<T>(
        &mut self,
        key: &str,
        convert: impl FnOnce(&'a Value, &FieldPath) -> Result<T, ValidationError>,
    ) -> Presence<T> {
        match self.take(key) {
            None => Presence::Absent,
            Some(Value::Null) => Presence::Null,
            Some(value) => {
                let path = self.path.key(key);
                match convert(value, &path) {
                    Ok(converted) => Presence::Set(converted),
                    Err(e) => {
                        self.errors.push(e);
                        Presence::Absent
                    }
                }
            }
        }
    }

    /// Optional field that may not be written as `null`.
    pub fn optional_non_null<T>(
        &mut self,
        key: &str,
        convert: impl FnOnce(&'a Value, &FieldPath) -> Result<T, ValidationError>,
    ) -> Presence<T> {
        match self.take(key) {
            None => Presence::Absent,
            Some(value) => self.convert(key, value, convert).into(),
        }
    }

    pub fn required<T>(
        &mut self,
        key: &str,
        convert: impl FnOnce(&'a Value, &FieldPath) -> Result<T, ValidationError>,
    ) -> Option<T> {
        match self.take(key) {
            None => {
                self.errors
                    .push(ValidationError::missing_field(&self.path, key));
                None
            }
            Some(value) => self.convert(key, value, convert),
        }
    }

    /// Optional non-empty list of nested objects.
    pub fn optional_list<T>(
        &mut self,
        key: &str,
        build: impl FnMut(&'a Value, &FieldPath) -> Built<T>,
    ) -> Presence<Vec<T>> {
        match self.take(key) {
            None => Presence::Absent,
            Some(Value::Null) => Presence::Null,
            Some(value) => self.build_list(key, value, build).into(),
        }
    }

    /// Required non-empty list of nested objects.
    pub fn required_list<T>(
        &mut self,
        key: &str,
        build: impl FnMut(&'a Value, &FieldPath) -> Built<T>,
    ) -> Option<Vec<T>> {
        match self.take(key) {
            None => {
                self.errors
                    .push(ValidationError::missing_field(&self.path, key));
                None
            }
            Some(value) => self.build_list(key, value, build),
        }
    }

    /// Optional single nested object.
    pub fn optional_object<T>(
        &mut self,
        key: &str,
        build: impl FnOnce(&'a Value, &FieldPath) -> Built<T>,
    ) -> Presence<T> {
        match self.take(key) {
            None => Presence::Absent,
            Some(Value::Null) => Presence::Null,
            Some(value) => self.build_nested(key, value, build).into(),
        }
    }

    /// Required single nested object.
    pub fn required_object<T>(
        &mut self,
        key: &str,
        build: impl FnOnce(&'a Value, &FieldPath) -> Built<T>,
    ) -> Option<T> {
        match self.take(key) {
            None => {
                self.errors
                    .push(ValidationError::missing_field(&self.path, key));
                None
            }
            Some(value) => self.build_nested(key, value, build),
        }
    }

    /// End the field-level pass. Unread keys become `UnexpectedField` errors.
    pub fn finish(mut self) -> Built<()> {
        for key in self.object.keys() {
            if !self.seen.contains(key) {
                self.errors
                    .push(ValidationError::unexpected_field(&self.path, key));
            }
        }
        self.sort_in_document_order();
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Errors collected so far, without the closed-field-set check.
    pub fn into_errors(mut self) -> Vec<ValidationError> {
        self.sort_in_document_order();
        self.errors
    }

    /// Order errors by the position of the field they sit under. Errors about absent
    /// fields have no position and keep their relative order at the end.
    fn sort_in_document_order(&mut self) {
        let object = self.object;
        let path = &self.path;
        self.errors.sort_by_key(|error| {
            error
                .path
                .child_key(path)
                .and_then(|key| object.keys().position(|k| k == key))
                .unwrap_or(usize::MAX)
        });
    }

    fn convert<T>(
        &mut self,
        key: &str,
        value: &'a Value,
        convert: impl FnOnce(&'a Value, &FieldPath) -> Result<T, ValidationError>,
    ) -> Option<T> {
        match convert(value, &self.path.key(key)) {
            Ok(converted) => Some(converted),
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }

    fn build_list<T>(
        &mut self,
        key: &str,
        value: &'a Value,
        mut build: impl FnMut(&'a Value, &FieldPath) -> Built<T>,
    ) -> Option<Vec<T>> {
        let path = self.path.key(key);
        let Some(items) = value.as_array() else {
            self.errors
                .push(ValidationError::invalid_type(&path, "a list"));
            return None;
        };
        if let Err(e) = check_non_empty(Some(items.as_slice()), &path) {
            self.errors.push(e);
            return None;
        }

        let mut built = Vec::with_capacity(items.len());
        let mut failed = false;
        for (i, item) in items.iter().enumerate() {
            match build(item, &path.index(i)) {
                Ok(b) => built.push(b),
                Err(errors) => {
                    self.errors.extend(errors);
                    failed = true;
                }
            }
        }
        (!failed).then_some(built)
    }

    fn build_nested<T>(
        &mut self,
        key: &str,
        value: &'a Value,
        build: impl FnOnce(&'a Value, &FieldPath) -> Built<T>,
    ) -> Option<T> {
        match build(value, &self.path.key(key)) {
            Ok(built) => Some(built),
            Err(errors) => {
                self.errors.extend(errors);
                None
            }
        }
    }
}

/// Unwrap a required field once `finish` has succeeded.
pub(crate) fn present<T>(value: Option<T>, path: &FieldPath, key: &str) -> Built<T> {
    value.ok_or_else(|| vec![ValidationError::missing_field(path, key)])
}

/// Collect object-level check results into the built value or every failure.
pub(crate) fn object_level<T>(
    value: T,
    checks: impl IntoIterator<Item = Result<(), ValidationError>>,
) -> Built<T> {
    let errors: Vec<ValidationError> = checks.into_iter().filter_map(Result::err).collect();
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Converters
// ---------------------------------------------------------------------------

pub(crate) fn string(value: &Value, path: &FieldPath) -> Result<String, ValidationError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| mismatch(value, path, "a string"))
}

pub(crate) fn json_path(value: &Value, path: &FieldPath) -> Result<String, ValidationError> {
    let s = string(value, path)?;
    check_json_path(value, path)?;
    Ok(s)
}

pub(crate) fn timestamp(value: &Value, path: &FieldPath) -> Result<String, ValidationError> {
    let s = string(value, path)?;
    check_iso8601(&s, path)?;
    Ok(s)
}

pub(crate) fn boolean(value: &Value, path: &FieldPath) -> Result<bool, ValidationError> {
    value
        .as_bool()
        .ok_or_else(|| mismatch(value, path, "a boolean"))
}

pub(crate) fn positive_integer(value: &Value, path: &FieldPath) -> Result<u64, ValidationError> {
    match value.as_u64() {
        Some(n) if n > 0 => Ok(n),
        _ if value.is_number() => Err(out_of_range(value, path, "a positive integer")),
        _ => Err(mismatch(value, path, "a positive integer")),
    }
}

pub(crate) fn non_negative_integer(
    value: &Value,
    path: &FieldPath,
) -> Result<u64, ValidationError> {
    match value.as_u64() {
        Some(n) => Ok(n),
        None if value.is_number() => Err(out_of_range(value, path, "a non-negative integer")),
        None => Err(mismatch(value, path, "a non-negative integer")),
    }
}

pub(crate) fn positive_number(value: &Value, path: &FieldPath) -> Result<Number, ValidationError> {
    match value {
        Value::Number(n) if n.as_f64().is_some_and(|f| f > 0.0) => Ok(n.clone()),
        Value::Number(_) => Err(out_of_range(value, path, "a positive number")),
        _ => Err(mismatch(value, path, "a positive number")),
    }
}

/// JSON object whose `.$` keys must hold JSONPaths.
pub(crate) fn payload(
    value: &Value,
    path: &FieldPath,
) -> Result<Map<String, Value>, ValidationError> {
    let Value::Object(map) = value else {
        return Err(mismatch(value, path, "an object"));
    };
    check_json_path(value, path)?;
    Ok(map.clone())
}

/// Any JSON value, checked with the JSONPath rules.
pub(crate) fn path_checked_value(value: &Value, path: &FieldPath) -> Result<Value, ValidationError> {
    check_json_path(value, path)?;
    Ok(value.clone())
}

/// Non-empty list of strings.
pub(crate) fn string_list(value: &Value, path: &FieldPath) -> Result<Vec<String>, ValidationError> {
    let Some(items) = value.as_array() else {
        return Err(mismatch(value, path, "a list of strings"));
    };
    check_non_empty(Some(items.as_slice()), path)?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| string(item, &path.index(i)))
        .collect()
}

fn mismatch(value: &Value, path: &FieldPath, expected: &str) -> ValidationError {
    ValidationError::invalid_type(path, &format!("{}, found {}", expected, json_type(value)))
}

fn out_of_range(value: &Value, path: &FieldPath, expected: &str) -> ValidationError {
    ValidationError::new(
        ErrorKind::InvalidValue,
        path,
        format!("Expected {}, found {}", expected, value),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unread_keys_are_unexpected() {
        let value = json!({"Known": "x", "Extra": true});
        let mut reader = ObjectReader::new(&value, &FieldPath::root()).unwrap();
        let _ = reader.optional("Known", string);
        let errors = reader.finish().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::UnexpectedField);
        assert_eq!(errors[0].path.to_string(), "Extra");
    }

    #[test]
    fn errors_follow_document_order() {
        let value = json!({"Bogus": 1, "InputPath": "x", "Type": "Pass"});
        let mut reader = ObjectReader::new(&value, &FieldPath::root()).unwrap();
        let _ = reader.required("Type", string);
        let _ = reader.optional("InputPath", json_path);
        let _ = reader.required("Resource", string);
        let errors = reader.finish().unwrap_err();
        let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["Bogus", "InputPath", "Resource"]);
    }

    #[test]
    fn explicit_null_is_preserved() {
        let value = json!({"Comment": null});
        let mut reader = ObjectReader::new(&value, &FieldPath::root()).unwrap();
        assert_eq!(reader.optional("Comment", string), Presence::Null);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn non_null_field_rejects_null() {
        let value = json!({"End": null});
        let mut reader = ObjectReader::new(&value, &FieldPath::root()).unwrap();
        assert_eq!(reader.optional_non_null("End", boolean), Presence::Absent);
        let errors = reader.finish().unwrap_err();
        assert_eq!(errors[0].kind, ErrorKind::InvalidType);
    }

    #[test]
    fn missing_required_field_is_reported() {
        let value = json!({});
        let mut reader = ObjectReader::new(&value, &FieldPath::root().key("States").key("A")).unwrap();
        assert_eq!(reader.required("Resource", string), None);
        let errors = reader.finish().unwrap_err();
        assert_eq!(errors[0].kind, ErrorKind::MissingRequiredField);
        assert_eq!(errors[0].path.to_string(), "States.A.Resource");
    }

    #[test]
    fn non_object_is_invalid_type() {
        let errors = ObjectReader::new(&json!([1]), &FieldPath::root()).err().unwrap();
        assert_eq!(errors[0].kind, ErrorKind::InvalidType);
    }

    #[test]
    fn numeric_converters_separate_type_and_range() {
        let path = FieldPath::root();
        assert_eq!(positive_integer(&json!(5), &path).unwrap(), 5);
        assert_eq!(positive_integer(&json!(0), &path).unwrap_err().kind, ErrorKind::InvalidValue);
        assert_eq!(positive_integer(&json!(1.5), &path).unwrap_err().kind, ErrorKind::InvalidValue);
        assert_eq!(positive_integer(&json!("5"), &path).unwrap_err().kind, ErrorKind::InvalidType);
        assert_eq!(non_negative_integer(&json!(0), &path).unwrap(), 0);
        assert_eq!(positive_number(&json!(-2), &path).unwrap_err().kind, ErrorKind::InvalidValue);
    }

    #[test]
    fn string_list_must_be_non_empty() {
        let path = FieldPath::root().key("ErrorEquals");
        assert_eq!(string_list(&json!([]), &path).unwrap_err().kind, ErrorKind::EmptyList);
        let err = string_list(&json!(["a", 1]), &path).unwrap_err();
        assert_eq!(err.path.to_string(), "ErrorEquals[1]");
    }
}
