//! Caller-supplied validation options.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorMode {
    /// Report every discoverable error.
    #[default]
    Aggregate,
    /// Report only the first error in document order.
    FailFast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Reachability {
    /// A state counts as reachable when `StartAt` or any transition names it.
    /// A state named only by an unreachable state is still accepted.
    #[default]
    Referenced,
    /// A state must be reachable by following transitions from `StartAt`.
    FromStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationOptions {
    pub error_mode: ErrorMode,
    pub reachability: Reachability,
}

impl ValidationOptions {
    pub fn fail_fast() -> Self {
        ValidationOptions {
            error_mode: ErrorMode::FailFast,
            ..Self::default()
        }
    }

    pub fn strict_reachability() -> Self {
        ValidationOptions {
            reachability: Reachability::FromStart,
            ..Self::default()
        }
    }
}
