//! Parse phase: JSON → validated, typed definition.

pub mod choice;
pub mod definition;
pub(crate) mod reader;
pub mod states;

use serde_json::Value;

use crate::config::{ErrorMode, ValidationOptions};
use crate::error::{ErrorKind, ValidationError, ValidationErrors};
use crate::model::{Definition, FieldPath};

/// Construct-and-validate from an untyped document node.
pub trait FromDocument: Sized {
    /// Build the value at `path`, returning every error found beneath it.
    fn from_document(
        value: &Value,
        path: &FieldPath,
        options: &ValidationOptions,
    ) -> Result<Self, Vec<ValidationError>>;

    fn from_value(value: &Value) -> Result<Self, ValidationErrors> {
        Self::from_value_with(value, &ValidationOptions::default())
    }

    fn from_value_with(value: &Value, options: &ValidationOptions) -> Result<Self, ValidationErrors> {
        Self::from_document(value, &FieldPath::root(), options)
            .map_err(|errors| report(errors, options))
    }
}

/// Decode a definition from JSON text and validate it.
pub fn parse(json: &str) -> Result<Definition, ValidationErrors> {
    parse_with(json, &ValidationOptions::default())
}

pub fn parse_with(json: &str, options: &ValidationOptions) -> Result<Definition, ValidationErrors> {
    let value = serde_json::from_str::<Value>(json).map_err(|e| {
        ValidationErrors::from(ValidationError::new(
            ErrorKind::MalformedJson,
            &FieldPath::root(),
            format!("Failed to parse definition JSON: {}", e),
        ))
    })?;
    Definition::from_value_with(&value, options)
}

fn report(mut errors: Vec<ValidationError>, options: &ValidationOptions) -> ValidationErrors {
    if options.error_mode == ErrorMode::FailFast {
        errors.truncate(1);
    }
    ValidationErrors::new(errors)
}
