//! Integration tests for definition-level graph rules and the transition graph.

mod helpers;

use asl_schema::model::TransitionKind;
use asl_schema::{Definition, ErrorKind, FromDocument, TransitionGraph, ValidationOptions, parse};
use helpers::*;
use serde_json::{Value, json};

fn pass_end() -> Value {
    json!({"Type": "Pass", "End": true})
}

#[test]
fn valid_start_state() {
    assert_round_trip::<Definition>(&json!({
        "StartAt": "SimplePass",
        "States": {"SimplePass": pass_end()}
    }));
}

#[test]
fn catch_refers_to_existing_state() {
    assert_round_trip::<Definition>(&json!({
        "StartAt": "SimpleTask",
        "States": {
            "SimpleTask": {
                "Type": "Task",
                "Resource": "https://example.org/hello_world",
                "Parameters": {},
                "Catch": [{"ErrorEquals": ["SomeError"], "Next": "HandlerState"}],
                "End": true
            },
            "HandlerState": pass_end()
        }
    }));
}

#[test]
fn choice_default_and_rule_refer_to_existing_state() {
    assert_round_trip::<Definition>(&json!({
        "StartAt": "ChoiceState",
        "States": {
            "ChoiceState": {
                "Type": "Choice",
                "Default": "FinalState",
                "Choices": [
                    {"Variable": "$.some_variable", "BooleanEquals": false, "Next": "FinalState"}
                ]
            },
            "FinalState": pass_end()
        }
    }));
}

#[test]
fn non_existent_start_state() {
    let errors = rejected::<Definition>(&json!({
        "StartAt": "DoesNotExistAsAState",
        "States": {"SimplePass": pass_end()}
    }));
    assert_eq!(
        rendered(&errors),
        vec![
            "[G001:UnknownStateReference] Definition contains a reference to unknown state(s): DoesNotExistAsAState",
            "[G002:UnreachableState] Definition contains unreachable state(s): SimplePass",
        ]
    );
}

#[test]
fn non_existent_next_state() {
    let errors = rejected::<Definition>(&json!({
        "StartAt": "SimplePass",
        "States": {
            "SimplePass": {"Type": "Pass", "Next": "SomeUndefinedState"},
            "SimplePass2": pass_end()
        }
    }));
    assert!(errors.contains(ErrorKind::UnknownStateReference));
    assert!(errors.contains(ErrorKind::UnreachableState));
}

#[test]
fn unreachable_state() {
    let errors = rejected::<Definition>(&json!({
        "StartAt": "SimplePass",
        "States": {"SimplePass": pass_end(), "UnreachableState": pass_end()}
    }));
    assert_eq!(errors.kinds(), vec![ErrorKind::UnreachableState]);
    assert!(errors.first().message.ends_with(": UnreachableState"));
}

#[test]
fn state_with_both_next_and_end() {
    let errors = rejected::<Definition>(&json!({
        "StartAt": "SimplePass",
        "States": {
            "SimplePass": {
                "Type": "Pass",
                "Comment": "both_next_and_end_states_defined",
                "Next": "SimplePass2",
                "End": true
            }
        }
    }));
    assert_eq!(errors.kinds(), vec![ErrorKind::ConflictingFields]);
    assert_has_error(&errors, ErrorKind::ConflictingFields, "States.SimplePass");
}

#[test]
fn dangling_targets_of_every_transition_kind() {
    let cases = [
        json!({
            "StartAt": "SimpleTask",
            "States": {
                "SimpleTask": {
                    "Type": "Task",
                    "Resource": "https://example.org/hello_world",
                    "Parameters": {},
                    "Catch": [{"ErrorEquals": ["SomeError"], "Next": "NotAState"}],
                    "End": true
                }
            }
        }),
        json!({
            "StartAt": "ChoiceState",
            "States": {
                "ChoiceState": {
                    "Type": "Choice",
                    "Default": "NotAState",
                    "Choices": [{"Variable": "$.v", "BooleanEquals": false, "Next": "FinalState"}]
                },
                "FinalState": pass_end()
            }
        }),
        json!({
            "StartAt": "ChoiceState",
            "States": {
                "ChoiceState": {
                    "Type": "Choice",
                    "Default": "FinalState",
                    "Choices": [{"Variable": "$.v", "BooleanEquals": false, "Next": "NotAState"}]
                },
                "FinalState": pass_end()
            }
        }),
        json!({
            "StartAt": "ChoiceState",
            "States": {
                "ChoiceState": {
                    "Type": "Choice",
                    "Choices": [{
                        "Or": [
                            {"Variable": "$.SomePath.status", "StringEquals": "FAILED"},
                            {"Variable": "$.SomePath.status", "StringEquals": "FAILED"}
                        ],
                        "Next": "NotAState"
                    }]
                },
                "FinalState": pass_end()
            }
        }),
    ];
    for case in cases {
        let errors = rejected::<Definition>(&case);
        assert!(
            errors
                .iter()
                .any(|e| e.kind == ErrorKind::UnknownStateReference && e.message.ends_with(": NotAState")),
            "{:?}",
            rendered(&errors)
        );
    }
}

#[test]
fn dangling_references_fixture() {
    let errors = parse(include_str!("fixtures/dangling_references.json")).unwrap_err();
    insta::assert_json_snapshot!(rendered(&errors), @r###"
    [
      "[G001:UnknownStateReference] Definition contains a reference to unknown state(s): AlsoNotAState, NotAState",
      "[G002:UnreachableState] Definition contains unreachable state(s): Orphan"
    ]
    "###);
}

#[test]
fn self_loop_is_allowed() {
    let definition = Definition::from_value(&json!({
        "StartAt": "Poll",
        "States": {
            "Poll": {
                "Type": "Choice",
                "Choices": [{"Variable": "$.done", "BooleanEquals": true, "Next": "Finished"}],
                "Default": "Poll"
            },
            "Finished": {"Type": "Succeed"}
        }
    }))
    .unwrap();
    let graph = TransitionGraph::build(&definition);
    assert_eq!(graph.predecessors("Poll"), vec!["Poll"]);
    assert_eq!(
        graph.successors("Poll"),
        vec![("Poll", TransitionKind::Default), ("Finished", TransitionKind::Choice)]
    );
}

#[test]
fn strict_reachability_is_opt_in() {
    let value = json!({
        "StartAt": "A",
        "States": {
            "A": pass_end(),
            "B": {"Type": "Pass", "Next": "C"},
            "C": {"Type": "Pass", "Next": "B"}
        }
    });
    // B and C name each other, so neither is unreferenced.
    assert!(Definition::from_value(&value).is_ok());

    let errors =
        Definition::from_value_with(&value, &ValidationOptions::strict_reachability()).unwrap_err();
    assert_has_error(&errors, ErrorKind::UnreachableState, "");
    assert!(errors.first().message.ends_with(": B, C"));
}

#[test]
fn graph_over_order_pipeline() {
    let definition = parse(include_str!("fixtures/order_pipeline.json")).unwrap();
    let graph = TransitionGraph::build(&definition);
    assert!(graph.undefined_references().is_empty());
    assert_eq!(graph.incoming_count("ShipExpress"), 2);
    assert_eq!(graph.predecessors("PackItems"), vec!["HoldForBatch", "ShipExpress"]);
    assert_eq!(graph.reachable_from_start().len(), 7);
}
