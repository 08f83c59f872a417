//! Per-variant state construction.
//!
//! Each constructor runs the field-level pass through an `ObjectReader`, then, only when
//! that pass is clean, the variant's object-level rules.

use serde_json::Value;

use super::FromDocument;
use super::choice::parse_rule;
use super::reader::{
    Built, ObjectReader, boolean, json_path, non_negative_integer, object_level, path_checked_value,
    payload, positive_integer, positive_number, present, string, string_list, timestamp,
};
use crate::config::ValidationOptions;
use crate::error::{ErrorKind, ValidationError};
use crate::model::{
    Catcher, ChoiceState, Definition, FailState, FieldPath, MapState, NextOrEnd, ParallelState,
    PassState, Retrier, State, StateKind, SucceedState, TaskState, WaitState,
};
use crate::validate::combinators::{require_at_most_one, require_exactly_one};

impl FromDocument for State {
    fn from_document(value: &Value, path: &FieldPath, options: &ValidationOptions) -> Built<Self> {
        let kind = match value.get("Type") {
            Some(Value::String(name)) => StateKind::from_name(name),
            _ => None,
        };
        let state = match kind {
            Some(StateKind::Pass) => State::Pass(PassState::from_document(value, path, options)?),
            Some(StateKind::Task) => State::Task(TaskState::from_document(value, path, options)?),
            Some(StateKind::Wait) => State::Wait(WaitState::from_document(value, path, options)?),
            Some(StateKind::Choice) => {
                State::Choice(ChoiceState::from_document(value, path, options)?)
            }
            Some(StateKind::Fail) => State::Fail(FailState::from_document(value, path, options)?),
            Some(StateKind::Succeed) => {
                State::Succeed(SucceedState::from_document(value, path, options)?)
            }
            Some(StateKind::Parallel) => {
                State::Parallel(ParallelState::from_document(value, path, options)?)
            }
            Some(StateKind::Map) => State::Map(MapState::from_document(value, path, options)?),
            None => {
                // Not an object, or no usable tag: let the reader report which.
                let mut r = ObjectReader::new(value, path)?;
                expect_kind(&mut r, None);
                return Err(r.into_errors());
            }
        };
        tracing::trace!(path = %path, kind = %state.kind(), "constructed state");
        Ok(state)
    }
}

/// Read `Type` and check it names `expected`. `None` only reports a missing or unknown tag.
fn expect_kind(r: &mut ObjectReader<'_>, expected: Option<StateKind>) {
    let path = r.path().key("Type");
    let error = match r.take("Type") {
        None | Some(Value::Null) => Some(format!(
            "Field 'Type' is required and must be one of: {}",
            kind_names()
        )),
        Some(Value::String(name)) => match (StateKind::from_name(name), expected) {
            (None, _) => Some(format!(
                "Unknown state type '{}'; expected one of: {}",
                name,
                kind_names()
            )),
            (Some(found), Some(expected)) if found != expected => Some(format!(
                "State type '{}' does not match the expected type '{}'",
                found, expected
            )),
            _ => None,
        },
        Some(other) => Some(format!(
            "Field 'Type' must be a string, found {}",
            super::reader::json_type(other)
        )),
    };
    if let Some(message) = error {
        r.push(ValidationError::new(ErrorKind::UnknownStateType, &path, message));
    }
}

fn kind_names() -> String {
    StateKind::ALL
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn read_flow(r: &mut ObjectReader<'_>) -> NextOrEnd {
    NextOrEnd {
        next: r.optional("Next", string),
        end: r.optional_non_null("End", boolean),
    }
}

/// A state hands off with `Next` or terminates with `End: true`, never both, never neither.
fn check_flow(flow: &NextOrEnd, path: &FieldPath) -> Result<(), ValidationError> {
    require_exactly_one(
        &[("Next", flow.next().is_some()), ("End", flow.is_end())],
        path,
    )
}

// =============================================================================
// PASS / TASK / WAIT
// =============================================================================

impl FromDocument for PassState {
    fn from_document(value: &Value, path: &FieldPath, _options: &ValidationOptions) -> Built<Self> {
        let mut r = ObjectReader::new(value, path)?;
        expect_kind(&mut r, Some(StateKind::Pass));
        let state = PassState {
            comment: r.optional("Comment", string),
            input_path: r.optional("InputPath", json_path),
            output_path: r.optional("OutputPath", json_path),
            result: r.optional("Result", path_checked_value),
            result_path: r.optional("ResultPath", json_path),
            parameters: r.optional("Parameters", payload),
            flow: read_flow(&mut r),
        };
        r.finish()?;

        let checks = [check_flow(&state.flow, path)];
        object_level(state, checks)
    }
}

impl FromDocument for TaskState {
    fn from_document(value: &Value, path: &FieldPath, options: &ValidationOptions) -> Built<Self> {
        let mut r = ObjectReader::new(value, path)?;
        expect_kind(&mut r, Some(StateKind::Task));
        let comment = r.optional("Comment", string);
        let input_path = r.optional("InputPath", json_path);
        let output_path = r.optional("OutputPath", json_path);
        let result_path = r.optional("ResultPath", json_path);
        let result_selector = r.optional("ResultSelector", payload);
        let parameters = r.optional("Parameters", payload);
        let resource = r.required("Resource", string);
        let timeout_seconds = r.optional("TimeoutSeconds", positive_integer);
        let timeout_seconds_path = r.optional("TimeoutSecondsPath", json_path);
        let heartbeat_seconds = r.optional("HeartbeatSeconds", positive_integer);
        let heartbeat_seconds_path = r.optional("HeartbeatSecondsPath", json_path);
        let retry = r.optional_list("Retry", |v, p| Retrier::from_document(v, p, options));
        let catch = r.optional_list("Catch", |v, p| Catcher::from_document(v, p, options));
        let flow = read_flow(&mut r);
        r.finish()?;

        let state = TaskState {
            comment,
            input_path,
            output_path,
            result_path,
            result_selector,
            parameters,
            resource: present(resource, path, "Resource")?,
            timeout_seconds,
            timeout_seconds_path,
            heartbeat_seconds,
            heartbeat_seconds_path,
            retry,
            catch,
            flow,
        };

        let checks = [
            check_flow(&state.flow, path),
            require_exactly_one(
                &[
                    ("InputPath", state.input_path.is_set()),
                    ("Parameters", state.parameters.is_set()),
                ],
                path,
            ),
            require_at_most_one(
                &[
                    ("TimeoutSeconds", state.timeout_seconds.is_set()),
                    ("TimeoutSecondsPath", state.timeout_seconds_path.is_set()),
                ],
                path,
            ),
            require_at_most_one(
                &[
                    ("HeartbeatSeconds", state.heartbeat_seconds.is_set()),
                    ("HeartbeatSecondsPath", state.heartbeat_seconds_path.is_set()),
                ],
                path,
            ),
            check_heartbeat(&state, path),
        ];
        object_level(state, checks)
    }
}

/// Only literal values are compared; a `*Path` side is resolved at run time.
fn check_heartbeat(state: &TaskState, path: &FieldPath) -> Result<(), ValidationError> {
    match (state.heartbeat_seconds.as_set(), state.timeout_seconds.as_set()) {
        (Some(heartbeat), Some(timeout)) if heartbeat > timeout => Err(ValidationError::new(
            ErrorKind::HeartbeatExceedsTimeout,
            &path.key("HeartbeatSeconds"),
            format!(
                "HeartbeatSeconds ({}) cannot be greater than TimeoutSeconds ({})",
                heartbeat, timeout
            ),
        )),
        _ => Ok(()),
    }
}

impl FromDocument for WaitState {
    fn from_document(value: &Value, path: &FieldPath, _options: &ValidationOptions) -> Built<Self> {
        let mut r = ObjectReader::new(value, path)?;
        expect_kind(&mut r, Some(StateKind::Wait));
        let state = WaitState {
            comment: r.optional("Comment", string),
            input_path: r.optional("InputPath", json_path),
            output_path: r.optional("OutputPath", json_path),
            seconds: r.optional("Seconds", non_negative_integer),
            timestamp: r.optional("Timestamp", timestamp),
            seconds_path: r.optional("SecondsPath", json_path),
            timestamp_path: r.optional("TimestampPath", json_path),
            flow: read_flow(&mut r),
        };
        r.finish()?;

        let checks = [
            check_flow(&state.flow, path),
            require_exactly_one(
                &[
                    ("Seconds", state.seconds.is_set()),
                    ("Timestamp", state.timestamp.is_set()),
                    ("SecondsPath", state.seconds_path.is_set()),
                    ("TimestampPath", state.timestamp_path.is_set()),
                ],
                path,
            ),
        ];
        object_level(state, checks)
    }
}

// =============================================================================
// CHOICE / FAIL / SUCCEED
// =============================================================================

impl FromDocument for ChoiceState {
    fn from_document(value: &Value, path: &FieldPath, _options: &ValidationOptions) -> Built<Self> {
        let mut r = ObjectReader::new(value, path)?;
        expect_kind(&mut r, Some(StateKind::Choice));
        let comment = r.optional("Comment", string);
        let input_path = r.optional("InputPath", json_path);
        let output_path = r.optional("OutputPath", json_path);
        let choices = r.required_list("Choices", parse_rule);
        let default = r.optional("Default", string);
        r.finish()?;

        Ok(ChoiceState {
            comment,
            input_path,
            output_path,
            choices: present(choices, path, "Choices")?,
            default,
        })
    }
}

impl FromDocument for FailState {
    fn from_document(value: &Value, path: &FieldPath, _options: &ValidationOptions) -> Built<Self> {
        let mut r = ObjectReader::new(value, path)?;
        expect_kind(&mut r, Some(StateKind::Fail));
        let state = FailState {
            comment: r.optional("Comment", string),
            cause: r.optional("Cause", string),
            error: r.optional("Error", string),
        };
        r.finish()?;
        Ok(state)
    }
}

impl FromDocument for SucceedState {
    fn from_document(value: &Value, path: &FieldPath, _options: &ValidationOptions) -> Built<Self> {
        let mut r = ObjectReader::new(value, path)?;
        expect_kind(&mut r, Some(StateKind::Succeed));
        let state = SucceedState {
            comment: r.optional("Comment", string),
            input_path: r.optional("InputPath", json_path),
            output_path: r.optional("OutputPath", json_path),
        };
        r.finish()?;
        Ok(state)
    }
}

// =============================================================================
// PARALLEL / MAP
// =============================================================================

impl FromDocument for ParallelState {
    fn from_document(value: &Value, path: &FieldPath, options: &ValidationOptions) -> Built<Self> {
        let mut r = ObjectReader::new(value, path)?;
        expect_kind(&mut r, Some(StateKind::Parallel));
        let comment = r.optional("Comment", string);
        let input_path = r.optional("InputPath", json_path);
        let output_path = r.optional("OutputPath", json_path);
        let result_path = r.optional("ResultPath", json_path);
        let result_selector = r.optional("ResultSelector", payload);
        let parameters = r.optional("Parameters", payload);
        let branches =
            r.required_list("Branches", |v, p| Definition::from_document(v, p, options));
        let retry = r.optional_list("Retry", |v, p| Retrier::from_document(v, p, options));
        let catch = r.optional_list("Catch", |v, p| Catcher::from_document(v, p, options));
        let flow = read_flow(&mut r);
        r.finish()?;

        let state = ParallelState {
            comment,
            input_path,
            output_path,
            result_path,
            result_selector,
            parameters,
            branches: present(branches, path, "Branches")?,
            retry,
            catch,
            flow,
        };
        let checks = [check_flow(&state.flow, path)];
        object_level(state, checks)
    }
}

impl FromDocument for MapState {
    fn from_document(value: &Value, path: &FieldPath, options: &ValidationOptions) -> Built<Self> {
        let mut r = ObjectReader::new(value, path)?;
        expect_kind(&mut r, Some(StateKind::Map));
        let comment = r.optional("Comment", string);
        let input_path = r.optional("InputPath", json_path);
        let output_path = r.optional("OutputPath", json_path);
        let result_path = r.optional("ResultPath", json_path);
        let result_selector = r.optional("ResultSelector", payload);
        let parameters = r.optional("Parameters", payload);
        let iterator =
            r.required_object("Iterator", |v, p| Definition::from_document(v, p, options));
        let items_path = r.required("ItemsPath", json_path);
        let max_concurrency = r.optional("MaxConcurrency", positive_integer);
        let retry = r.optional_list("Retry", |v, p| Retrier::from_document(v, p, options));
        let catch = r.optional_list("Catch", |v, p| Catcher::from_document(v, p, options));
        let flow = read_flow(&mut r);
        r.finish()?;

        let state = MapState {
            comment,
            input_path,
            output_path,
            result_path,
            result_selector,
            parameters,
            iterator: Box::new(present(iterator, path, "Iterator")?),
            items_path: present(items_path, path, "ItemsPath")?,
            max_concurrency,
            retry,
            catch,
            flow,
        };
        let checks = [check_flow(&state.flow, path)];
        object_level(state, checks)
    }
}

// =============================================================================
// RETRY / CATCH
// =============================================================================

impl FromDocument for Retrier {
    fn from_document(value: &Value, path: &FieldPath, _options: &ValidationOptions) -> Built<Self> {
        let mut r = ObjectReader::new(value, path)?;
        let error_equals = r.required("ErrorEquals", string_list);
        let interval_seconds = r.optional("IntervalSeconds", positive_integer);
        let max_attempts = r.optional("MaxAttempts", positive_integer);
        let backoff_rate = r.optional("BackoffRate", positive_number);
        r.finish()?;

        Ok(Retrier {
            error_equals: present(error_equals, path, "ErrorEquals")?,
            interval_seconds,
            max_attempts,
            backoff_rate,
        })
    }
}

impl FromDocument for Catcher {
    fn from_document(value: &Value, path: &FieldPath, _options: &ValidationOptions) -> Built<Self> {
        let mut r = ObjectReader::new(value, path)?;
        let error_equals = r.required("ErrorEquals", string_list);
        let next = r.required("Next", string);
        let result_path = r.optional("ResultPath", json_path);
        r.finish()?;

        Ok(Catcher {
            error_equals: present(error_equals, path, "ErrorEquals")?,
            next: present(next, path, "Next")?,
            result_path,
        })
    }
}
