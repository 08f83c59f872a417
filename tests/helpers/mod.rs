#![allow(dead_code)]

use asl_schema::{ErrorKind, FromDocument, ValidationErrors};
use serde::Serialize;
use serde_json::Value;

// =============================================================================
// Assertions
// =============================================================================

/// Assert that `errors` holds an error of `kind` reported at `path`.
pub fn assert_has_error(errors: &ValidationErrors, kind: ErrorKind, path: &str) {
    assert!(
        errors
            .iter()
            .any(|e| e.kind == kind && e.path.to_string() == path),
        "Expected {:?} at '{}', got: {:#?}",
        kind,
        path,
        errors.iter().map(ToString::to_string).collect::<Vec<_>>()
    );
}

/// Construct `T` from `input` and assert it re-serializes to exactly `input`.
pub fn assert_round_trip<T: FromDocument + Serialize>(input: &Value) {
    let built = T::from_value(input).unwrap_or_else(|errors| {
        panic!(
            "Expected a valid document, got: {:#?}",
            errors.iter().map(ToString::to_string).collect::<Vec<_>>()
        )
    });
    let output = serde_json::to_value(&built).expect("Should serialize");
    assert_eq!(&output, input);
}

/// Construct `T` from `input`, expecting a rejection.
pub fn rejected<T: FromDocument + std::fmt::Debug>(input: &Value) -> ValidationErrors {
    match T::from_value(input) {
        Ok(built) => panic!("Expected a rejection, got: {:#?}", built),
        Err(errors) => errors,
    }
}

/// Rendered error lines, for snapshots.
pub fn rendered(errors: &ValidationErrors) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}
