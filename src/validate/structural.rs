//! Definition-level structural rules (D001–D002, G001–G002).

use std::collections::BTreeSet;

use crate::config::{Reachability, ValidationOptions};
use crate::error::{ErrorKind, ValidationError};
use crate::graph::TransitionGraph;
use crate::model::{Definition, FieldPath};

pub const MAX_STATE_NAME_LEN: usize = 128;

/// Run the graph rules over a definition whose states all constructed. Both rules always
/// run so a definition with dangling and orphaned states reports both.
pub fn validate_transitions(
    definition: &Definition,
    path: &FieldPath,
    options: &ValidationOptions,
) -> Vec<ValidationError> {
    let graph = TransitionGraph::build(definition);
    let mut errors = Vec::new();

    g001_references_defined(&graph, path, &mut errors);
    g002_states_reachable(definition, &graph, path, options.reachability, &mut errors);

    errors
}

/// State names are 1 to 128 characters.
pub fn d001_state_names(
    names: &[&str],
    path: &FieldPath,
    errors: &mut Vec<ValidationError>,
) {
    let invalid: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| name.is_empty() || name.chars().count() > MAX_STATE_NAME_LEN)
        .collect();
    if !invalid.is_empty() {
        errors.push(ValidationError::new(
            ErrorKind::InvalidStateName,
            path,
            format!(
                "The following states have invalid names: {}",
                invalid
                    .iter()
                    .map(|name| format!("'{}'", name))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ));
    }
}

pub fn d002_states_not_empty(count: usize, path: &FieldPath, errors: &mut Vec<ValidationError>) {
    if count == 0 {
        errors.push(ValidationError::new(
            ErrorKind::EmptyStateMap,
            path,
            "At least one state is required",
        ));
    }
}

fn g001_references_defined(
    graph: &TransitionGraph,
    path: &FieldPath,
    errors: &mut Vec<ValidationError>,
) {
    let undefined = graph.undefined_references();
    if !undefined.is_empty() {
        errors.push(ValidationError::new(
            ErrorKind::UnknownStateReference,
            path,
            format!(
                "Definition contains a reference to unknown state(s): {}",
                join(&undefined)
            ),
        ));
    }
}

fn g002_states_reachable(
    definition: &Definition,
    graph: &TransitionGraph,
    path: &FieldPath,
    reachability: Reachability,
    errors: &mut Vec<ValidationError>,
) {
    let reached = match reachability {
        Reachability::Referenced => graph.referenced(),
        Reachability::FromStart => graph.reachable_from_start(),
    };
    let unreachable: BTreeSet<&str> = definition
        .defined_states()
        .into_iter()
        .filter(|name| !reached.contains(name))
        .collect();
    if !unreachable.is_empty() {
        errors.push(ValidationError::new(
            ErrorKind::UnreachableState,
            path,
            format!(
                "Definition contains unreachable state(s): {}",
                join(&unreachable)
            ),
        ));
    }
}

fn join(names: &BTreeSet<&str>) -> String {
    names.iter().copied().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{FromDocument, parse};
    use serde_json::json;

    #[test]
    fn long_and_empty_names_are_rejected() {
        let long = "x".repeat(MAX_STATE_NAME_LEN + 1);
        let fits = "y".repeat(MAX_STATE_NAME_LEN);
        let mut errors = Vec::new();
        d001_state_names(&["", long.as_str(), fits.as_str()], &FieldPath::root().key("States"), &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::InvalidStateName);
        assert!(errors[0].message.contains(&long));
        assert!(!errors[0].message.contains(&fits));
    }

    #[test]
    fn empty_state_map() {
        let mut errors = Vec::new();
        d002_states_not_empty(0, &FieldPath::root(), &mut errors);
        d002_states_not_empty(1, &FieldPath::root(), &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::EmptyStateMap);
    }

    fn orphan_chain() -> serde_json::Value {
        // B is never referenced; C is referenced only by B.
        json!({
            "StartAt": "A",
            "States": {
                "A": {"Type": "Pass", "End": true},
                "B": {"Type": "Pass", "Next": "C"},
                "C": {"Type": "Pass", "End": true}
            }
        })
    }

    #[test]
    fn referenced_mode_accepts_states_named_by_orphans() {
        let errors = Definition::from_value(&orphan_chain()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.first().message,
            "Definition contains unreachable state(s): B"
        );
    }

    #[test]
    fn from_start_mode_walks_the_graph() {
        let errors = Definition::from_value_with(
            &orphan_chain(),
            &ValidationOptions::strict_reachability(),
        )
        .unwrap_err();
        assert_eq!(
            errors.first().message,
            "Definition contains unreachable state(s): B, C"
        );
    }

    #[test]
    fn both_graph_rules_report_together() {
        let errors = parse(
            r#"{"StartAt": "Z", "States": {"A": {"Type": "Pass", "Next": "Y"}}}"#,
        )
        .unwrap_err();
        assert_eq!(
            errors.kinds(),
            vec![ErrorKind::UnknownStateReference, ErrorKind::UnreachableState]
        );
        assert_eq!(
            errors.first().message,
            "Definition contains a reference to unknown state(s): Y, Z"
        );
    }
}
