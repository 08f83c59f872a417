//! WASM entry points for browser use.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::ValidationOptions;
use crate::error::{ErrorKind, ValidationError};

/// Validate a definition JSON with default options.
/// Returns `{status: "valid" | "rejected", errors: [...]}`.
#[wasm_bindgen]
pub fn validate_definition(json: &str) -> JsValue {
    to_js(&validate_definition_inner(json, &ValidationOptions::default()))
}

/// Validate with options given as JSON, e.g. `{"errorMode":"failFast"}`.
#[wasm_bindgen]
pub fn validate_definition_with(json: &str, options_json: &str) -> JsValue {
    let result = match decode_options(options_json) {
        Ok(options) => validate_definition_inner(json, &options),
        Err(error) => ValidateResult::rejected(vec![error]),
    };
    to_js(&result)
}

/// Validate and re-serialize with only the fields the document wrote.
/// Returns `{status: "valid", definition: {...}}` or `{status: "rejected", errors: [...]}`.
#[wasm_bindgen]
pub fn normalize_definition(json: &str) -> JsValue {
    to_js(&normalize_definition_inner(json))
}

pub(crate) fn validate_definition_inner(json: &str, options: &ValidationOptions) -> ValidateResult {
    match crate::parse::parse_with(json, options) {
        Ok(_) => ValidateResult {
            status: Status::Valid,
            errors: vec![],
        },
        Err(errors) => ValidateResult::rejected(errors.into_iter().map(ErrorDto::from).collect()),
    }
}

pub(crate) fn normalize_definition_inner(json: &str) -> NormalizeResult {
    let definition = match crate::parse::parse(json) {
        Ok(d) => d,
        Err(errors) => {
            return NormalizeResult::Rejected {
                errors: errors.into_iter().map(ErrorDto::from).collect(),
            };
        }
    };
    match definition.to_value() {
        Ok(definition) => NormalizeResult::Valid { definition },
        Err(e) => NormalizeResult::Rejected {
            errors: vec![ErrorDto {
                code: "P001".into(),
                kind: ErrorKind::MalformedJson.to_string(),
                path: String::new(),
                message: format!("Failed to serialize definition: {}", e),
            }],
        },
    }
}

fn decode_options(options_json: &str) -> Result<ValidationOptions, ErrorDto> {
    serde_json::from_str(options_json).map_err(|e| ErrorDto {
        code: ErrorKind::MalformedJson.code().into(),
        kind: ErrorKind::MalformedJson.to_string(),
        path: String::new(),
        message: format!("Failed to parse options JSON: {}", e),
    })
}

/// Plain JS objects rather than `Map`s, so nested definitions read like JSON.
fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ErrorDto {
    pub code: String,
    pub kind: String,
    pub path: String,
    pub message: String,
}

impl From<ValidationError> for ErrorDto {
    fn from(e: ValidationError) -> Self {
        ErrorDto {
            code: e.kind.code().into(),
            kind: e.kind.to_string(),
            path: e.path.to_string(),
            message: e.message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Status {
    Valid,
    Rejected,
}

#[derive(Debug, Serialize)]
pub(crate) struct ValidateResult {
    pub status: Status,
    pub errors: Vec<ErrorDto>,
}

impl ValidateResult {
    fn rejected(errors: Vec<ErrorDto>) -> Self {
        ValidateResult {
            status: Status::Rejected,
            errors,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub(crate) enum NormalizeResult {
    Valid { definition: serde_json::Value },
    Rejected { errors: Vec<ErrorDto> },
}
