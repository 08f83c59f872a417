//! Failure-handling declarations attached to Task, Parallel and Map states.
//! Validated for shape only; nothing here retries or catches anything.

use serde::Serialize;
use serde_json::Number;

use super::presence::Presence;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Retrier {
    pub error_equals: Vec<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub interval_seconds: Presence<u64>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub max_attempts: Presence<u64>,
    /// Kept as the written JSON number so `2` does not come back as `2.0`.
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub backoff_rate: Presence<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Catcher {
    pub error_equals: Vec<String>,
    pub next: String,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub result_path: Presence<String>,
}
