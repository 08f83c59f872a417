//! Unified validation error type used across all phases.

use serde::Serialize;

use crate::model::path::FieldPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    MalformedJson,
    UnknownStateType,
    UnexpectedField,
    MissingRequiredField,
    ConflictingFields,
    InvalidJsonPath,
    InvalidTimestamp,
    EmptyList,
    HeartbeatExceedsTimeout,
    InvalidType,
    InvalidValue,
    InvalidStateName,
    EmptyStateMap,
    UnknownStateReference,
    UnreachableState,
}

impl ErrorKind {
    /// Stable short code: `P` for decoding, `S` for state/field level,
    /// `D` for definition level, `G` for graph level.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::MalformedJson => "P001",
            ErrorKind::UnknownStateType => "S001",
            ErrorKind::UnexpectedField => "S002",
            ErrorKind::MissingRequiredField => "S003",
            ErrorKind::ConflictingFields => "S004",
            ErrorKind::InvalidJsonPath => "S005",
            ErrorKind::InvalidTimestamp => "S006",
            ErrorKind::EmptyList => "S007",
            ErrorKind::HeartbeatExceedsTimeout => "S008",
            ErrorKind::InvalidType => "S009",
            ErrorKind::InvalidValue => "S010",
            ErrorKind::InvalidStateName => "D001",
            ErrorKind::EmptyStateMap => "D002",
            ErrorKind::UnknownStateReference => "G001",
            ErrorKind::UnreachableState => "G002",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub path: FieldPath,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_root() {
            write!(f, "[{}:{}] {}", self.kind.code(), self.kind, self.message)
        } else {
            write!(
                f,
                "[{}:{}] {} (at '{}')",
                self.kind.code(),
                self.kind,
                self.message,
                self.path
            )
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn new(kind: ErrorKind, path: &FieldPath, message: impl Into<String>) -> Self {
        ValidationError {
            kind,
            path: path.clone(),
            message: message.into(),
        }
    }

    pub fn unexpected_field(path: &FieldPath, key: &str) -> Self {
        Self::new(
            ErrorKind::UnexpectedField,
            &path.key(key),
            format!("Field '{}' is not permitted here", key),
        )
    }

    pub fn missing_field(path: &FieldPath, key: &str) -> Self {
        Self::new(
            ErrorKind::MissingRequiredField,
            &path.key(key),
            format!("Field '{}' is required", key),
        )
    }

    pub fn invalid_type(path: &FieldPath, expected: &str) -> Self {
        Self::new(
            ErrorKind::InvalidType,
            path,
            format!("Expected {}", expected),
        )
    }
}

/// Non-empty set of errors a rejected document produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("definition rejected with {} error(s); first: {}", .0.len(), .0[0])]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Wrap collected errors. Callers only build this from a non-empty list.
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        debug_assert!(!errors.is_empty());
        ValidationErrors(errors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn first(&self) -> &ValidationError {
        &self.0[0]
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.0.iter().map(|e| e.kind).collect()
    }

    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.0.iter().any(|e| e.kind == kind)
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(e: ValidationError) -> Self {
        ValidationErrors(vec![e])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
