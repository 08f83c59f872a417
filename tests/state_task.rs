//! Integration tests for Task states and their Retry/Catch declarations.

mod helpers;

use asl_schema::ErrorKind;
use asl_schema::model::{Catcher, Retrier, TaskState};
use helpers::*;
use serde_json::{Value, json};

fn task(extra: Value) -> Value {
    let mut base = json!({
        "Type": "Task",
        "Comment": "No info",
        "Resource": "http://localhost:5000",
        "Parameters": {},
        "ResultPath": "$.some_path",
        "End": true
    });
    let (Value::Object(base_map), Value::Object(extra)) = (&mut base, extra) else {
        panic!("task() takes an object");
    };
    for (key, value) in extra {
        if value.is_null() {
            base_map.remove(&key);
        } else {
            base_map.insert(key, value);
        }
    }
    base
}

#[test]
fn simple_task_state() {
    assert_round_trip::<TaskState>(&task(json!({})));
}

#[test]
fn task_state_with_catchers() {
    assert_round_trip::<TaskState>(&task(json!({
        "Catch": [
            {"ErrorEquals": ["ErrorA", "ErrorB"], "Next": "TerminalState"},
            {"ErrorEquals": ["ErrorC"], "Next": "TerminalState", "ResultPath": "$.error"}
        ]
    })));
}

#[test]
fn task_state_with_json_path_parameters() {
    assert_round_trip::<TaskState>(&task(json!({
        "Parameters": {"a_json_path.$": "$.a_json_path"}
    })));
}

#[test]
fn resource_is_opaque() {
    for resource in ["localhost:5000", "pgsql://localhost:5000", "arn:aws:states:::lambda:invoke"] {
        assert_round_trip::<TaskState>(&task(json!({"Resource": resource})));
    }
}

#[test]
fn task_state_with_retry() {
    assert_round_trip::<TaskState>(&task(json!({
        "Retry": [
            {"ErrorEquals": ["States.Timeout"], "IntervalSeconds": 3, "MaxAttempts": 2, "BackoffRate": 1.5},
            {"ErrorEquals": ["States.ALL"], "BackoffRate": 2}
        ]
    })));
}

#[test]
fn catcher_with_invalid_result_path() {
    let errors = rejected::<TaskState>(&task(json!({
        "Catch": [{"ErrorEquals": ["ErrorA"], "Next": "TerminalState", "ResultPath": "NOT_A_JSON_PATH"}]
    })));
    assert_has_error(&errors, ErrorKind::InvalidJsonPath, "Catch[0].ResultPath");
}

#[test]
fn catcher_with_empty_error_equals() {
    let errors = rejected::<TaskState>(&task(json!({
        "Catch": [{"ErrorEquals": [], "Next": "TerminalState"}]
    })));
    assert_has_error(&errors, ErrorKind::EmptyList, "Catch[0].ErrorEquals");
}

#[test]
fn catcher_with_extra_fields() {
    let errors = rejected::<TaskState>(&task(json!({
        "Catch": [{"ErrorEquals": ["ErrorA"], "Next": "TerminalState", "ThisIsAnExtraField": true}]
    })));
    assert_has_error(&errors, ErrorKind::UnexpectedField, "Catch[0].ThisIsAnExtraField");
}

#[test]
fn empty_catch_and_retry_lists() {
    let errors = rejected::<TaskState>(&task(json!({"Catch": [], "Retry": []})));
    assert_has_error(&errors, ErrorKind::EmptyList, "Catch");
    assert_has_error(&errors, ErrorKind::EmptyList, "Retry");
}

#[test]
fn missing_parameters_and_input_path() {
    let errors = rejected::<TaskState>(&task(json!({"Parameters": null})));
    assert_eq!(errors.kinds(), vec![ErrorKind::MissingRequiredField]);
    assert_eq!(
        errors.first().message,
        "At least one of the following fields must be set: InputPath, Parameters"
    );
}

#[test]
fn input_path_and_parameters_conflict() {
    let errors = rejected::<TaskState>(&task(json!({"InputPath": "$.input"})));
    assert_eq!(errors.kinds(), vec![ErrorKind::ConflictingFields]);
}

#[test]
fn input_path_is_not_json_path() {
    let errors = rejected::<TaskState>(&task(json!({"Parameters": null, "InputPath": "NOT_JSON_PATH"})));
    assert_has_error(&errors, ErrorKind::InvalidJsonPath, "InputPath");
}

#[test]
fn result_path_is_not_json_path() {
    let errors = rejected::<TaskState>(&task(json!({"ResultPath": "NOT_JSON_PATH"})));
    assert_has_error(&errors, ErrorKind::InvalidJsonPath, "ResultPath");
}

#[test]
fn parameters_are_not_an_object() {
    let errors = rejected::<TaskState>(&task(json!({"Parameters": true})));
    assert_has_error(&errors, ErrorKind::InvalidType, "Parameters");
}

#[test]
fn nested_parameters_with_invalid_json_path_value() {
    let errors = rejected::<TaskState>(&task(json!({
        "Parameters": {"a_json_path.$": "not_a_json_path"}
    })));
    assert_has_error(&errors, ErrorKind::InvalidJsonPath, "Parameters.a_json_path.$");
}

#[test]
fn missing_resource() {
    let errors = rejected::<TaskState>(&task(json!({"Resource": null, "Parameters": true})));
    assert_has_error(&errors, ErrorKind::MissingRequiredField, "Resource");
    assert_has_error(&errors, ErrorKind::InvalidType, "Parameters");
}

// =============================================================================
// Timeout / heartbeat
// =============================================================================

#[test]
fn heartbeat_exceeding_timeout() {
    let errors = rejected::<TaskState>(&task(json!({"HeartbeatSeconds": 30, "TimeoutSeconds": 10})));
    assert_eq!(errors.kinds(), vec![ErrorKind::HeartbeatExceedsTimeout]);
    assert_eq!(errors.first().path.to_string(), "HeartbeatSeconds");
    assert_eq!(
        errors.first().message,
        "HeartbeatSeconds (30) cannot be greater than TimeoutSeconds (10)"
    );
}

#[test]
fn heartbeat_within_timeout() {
    assert_round_trip::<TaskState>(&task(json!({"HeartbeatSeconds": 10, "TimeoutSeconds": 30})));
    assert_round_trip::<TaskState>(&task(json!({"HeartbeatSeconds": 30, "TimeoutSeconds": 30})));
    assert_round_trip::<TaskState>(&task(json!({"HeartbeatSeconds": 30})));
    assert_round_trip::<TaskState>(&task(json!({"TimeoutSeconds": 10})));
}

#[test]
fn heartbeat_against_timeout_path_is_not_compared() {
    assert_round_trip::<TaskState>(&task(json!({
        "HeartbeatSeconds": 300,
        "TimeoutSecondsPath": "$.timeout"
    })));
}

#[test]
fn timeout_literal_and_path_conflict() {
    let errors = rejected::<TaskState>(&task(json!({
        "TimeoutSeconds": 10,
        "TimeoutSecondsPath": "$.timeout"
    })));
    assert_eq!(errors.kinds(), vec![ErrorKind::ConflictingFields]);

    let errors = rejected::<TaskState>(&task(json!({
        "HeartbeatSeconds": 10,
        "HeartbeatSecondsPath": "$.heartbeat"
    })));
    assert_eq!(errors.kinds(), vec![ErrorKind::ConflictingFields]);
}

#[test]
fn timeouts_must_be_positive_integers() {
    let errors = rejected::<TaskState>(&task(json!({"TimeoutSeconds": 0})));
    assert_has_error(&errors, ErrorKind::InvalidValue, "TimeoutSeconds");

    let errors = rejected::<TaskState>(&task(json!({"HeartbeatSeconds": "10"})));
    assert_has_error(&errors, ErrorKind::InvalidType, "HeartbeatSeconds");
}

// =============================================================================
// Retrier / Catcher in isolation
// =============================================================================

#[test]
fn retrier_fields_are_checked() {
    let errors = rejected::<Retrier>(&json!({
        "ErrorEquals": ["States.ALL"],
        "IntervalSeconds": 0,
        "MaxAttempts": -1,
        "BackoffRate": 0,
        "JitterStrategy": "FULL"
    }));
    assert_eq!(
        errors.kinds(),
        vec![
            ErrorKind::InvalidValue,
            ErrorKind::InvalidValue,
            ErrorKind::InvalidValue,
            ErrorKind::UnexpectedField,
        ]
    );
}

#[test]
fn retrier_requires_error_equals() {
    let errors = rejected::<Retrier>(&json!({"MaxAttempts": 3}));
    assert_has_error(&errors, ErrorKind::MissingRequiredField, "ErrorEquals");
}

#[test]
fn catcher_requires_next() {
    let errors = rejected::<Catcher>(&json!({"ErrorEquals": ["States.ALL"]}));
    assert_has_error(&errors, ErrorKind::MissingRequiredField, "Next");
}
