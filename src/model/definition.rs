use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::presence::Presence;
use super::state::State;

/// A validated workflow definition. States keep their document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Definition {
    pub start_at: String,
    pub states: IndexMap<String, State>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub comment: Presence<String>,
}

impl Definition {
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    /// `StartAt` plus every transition target of every state.
    pub fn referenced_states(&self) -> BTreeSet<&str> {
        let mut referenced = BTreeSet::from([self.start_at.as_str()]);
        for state in self.states.values() {
            referenced.extend(state.transitions());
        }
        referenced
    }

    pub fn defined_states(&self) -> BTreeSet<&str> {
        self.states.keys().map(String::as_str).collect()
    }

    /// Re-serialize with only the fields that were written in the source document.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
