//! Exclusivity rules over a group of named fields on one object.
//!
//! These run in the object-level pass, after every field passed its own checks, and read
//! presence as `(field name, is set)` pairs in declaration order.

use crate::error::{ErrorKind, ValidationError};
use crate::model::path::FieldPath;

/// Exactly one of `fields` must be set.
pub fn require_exactly_one(
    fields: &[(&str, bool)],
    path: &FieldPath,
) -> Result<(), ValidationError> {
    require_at_most_one(fields, path)?;
    if fields.iter().any(|(_, set)| *set) {
        return Ok(());
    }
    let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    Err(ValidationError::new(
        ErrorKind::MissingRequiredField,
        path,
        format!(
            "At least one of the following fields must be set: {}",
            names.join(", ")
        ),
    ))
}

/// At most one of `fields` may be set.
pub fn require_at_most_one(
    fields: &[(&str, bool)],
    path: &FieldPath,
) -> Result<(), ValidationError> {
    let mut set: Vec<&str> = fields
        .iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| *name)
        .collect();
    if set.len() <= 1 {
        return Ok(());
    }
    set.sort_unstable();
    Err(ValidationError::new(
        ErrorKind::ConflictingFields,
        path,
        format!(
            "Only one of the following fields may be set: {}",
            set.join(", ")
        ),
    ))
}
