//! Definition construction: `StartAt`, `States`, `Comment`, then the graph rules.

use indexmap::IndexMap;
use serde_json::Value;

use super::FromDocument;
use super::reader::{Built, ObjectReader, json_type, present, string};
use crate::config::ValidationOptions;
use crate::error::ValidationError;
use crate::model::{Definition, FieldPath, State};
use crate::validate::structural::{d001_state_names, d002_states_not_empty, validate_transitions};

impl FromDocument for Definition {
    fn from_document(value: &Value, path: &FieldPath, options: &ValidationOptions) -> Built<Self> {
        tracing::debug!(path = %path, depth = path.depth(), "validating definition");

        let mut r = ObjectReader::new(value, path)?;
        let start_at = r.required("StartAt", string);
        let comment = r.optional("Comment", string);
        let states = match r.take("States") {
            None => {
                r.push(ValidationError::missing_field(path, "States"));
                None
            }
            Some(value) => read_states(&mut r, value, &path.key("States"), options),
        };
        r.finish()?;

        let definition = Definition {
            start_at: present(start_at, path, "StartAt")?,
            states: present(states, path, "States")?,
            comment,
        };

        let errors = validate_transitions(&definition, path, options);
        tracing::debug!(
            path = %path,
            states = definition.states.len(),
            errors = errors.len(),
            "definition validated"
        );
        if errors.is_empty() {
            Ok(definition)
        } else {
            Err(errors)
        }
    }
}

/// Build every state; any failure is pushed to `r` and leaves the map unbuilt.
fn read_states(
    r: &mut ObjectReader<'_>,
    value: &Value,
    path: &FieldPath,
    options: &ValidationOptions,
) -> Option<IndexMap<String, State>> {
    let Some(object) = value.as_object() else {
        r.push(ValidationError::invalid_type(
            path,
            &format!("an object, found {}", json_type(value)),
        ));
        return None;
    };

    let mut errors = Vec::new();
    let names: Vec<&str> = object.keys().map(String::as_str).collect();
    d002_states_not_empty(names.len(), path, &mut errors);
    d001_state_names(&names, path, &mut errors);

    let mut states = IndexMap::with_capacity(object.len());
    for (name, state) in object {
        match State::from_document(state, &path.key(name.as_str()), options) {
            Ok(state) => {
                states.insert(name.clone(), state);
            }
            Err(state_errors) => errors.extend(state_errors),
        }
    }

    if errors.is_empty() {
        return Some(states);
    }
    for error in errors {
        r.push(error);
    }
    None
}
