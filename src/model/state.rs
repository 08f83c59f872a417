//! State variants: a closed tagged union over the eight state kinds.

use serde::Serialize;
use serde_json::{Map, Value};

use super::choice::ChoiceRule;
use super::definition::Definition;
use super::handlers::{Catcher, Retrier};
use super::presence::Presence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StateKind {
    Pass,
    Task,
    Wait,
    Choice,
    Fail,
    Succeed,
    Parallel,
    Map,
}

impl StateKind {
    pub const ALL: [StateKind; 8] = [
        StateKind::Pass,
        StateKind::Task,
        StateKind::Wait,
        StateKind::Choice,
        StateKind::Fail,
        StateKind::Succeed,
        StateKind::Parallel,
        StateKind::Map,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StateKind::Pass => "Pass",
            StateKind::Task => "Task",
            StateKind::Wait => "Wait",
            StateKind::Choice => "Choice",
            StateKind::Fail => "Fail",
            StateKind::Succeed => "Succeed",
            StateKind::Parallel => "Parallel",
            StateKind::Map => "Map",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a transition was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransitionKind {
    Next,
    Catch,
    Default,
    Choice,
}

// =============================================================================
// SHARED SHAPES
// =============================================================================

/// `Next` xor `End: true`, shared by Pass, Task, Wait, Parallel and Map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NextOrEnd {
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub next: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub end: Presence<bool>,
}

impl NextOrEnd {
    pub fn next(&self) -> Option<&str> {
        self.next.as_set().map(String::as_str)
    }

    pub fn is_end(&self) -> bool {
        self.end.as_set().copied().unwrap_or(false)
    }
}

pub type Payload = Map<String, Value>;

// =============================================================================
// VARIANTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PassState {
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub comment: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub input_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub output_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub result: Presence<Value>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub result_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub parameters: Presence<Payload>,
    #[serde(flatten)]
    pub flow: NextOrEnd,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskState {
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub comment: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub input_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub output_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub result_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub result_selector: Presence<Payload>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub parameters: Presence<Payload>,
    /// Opaque identifier; never interpreted.
    pub resource: String,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub timeout_seconds: Presence<u64>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub timeout_seconds_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub heartbeat_seconds: Presence<u64>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub heartbeat_seconds_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub retry: Presence<Vec<Retrier>>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub catch: Presence<Vec<Catcher>>,
    #[serde(flatten)]
    pub flow: NextOrEnd,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WaitState {
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub comment: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub input_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub output_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub seconds: Presence<u64>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub timestamp: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub seconds_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub timestamp_path: Presence<String>,
    #[serde(flatten)]
    pub flow: NextOrEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChoiceState {
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub comment: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub input_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub output_path: Presence<String>,
    pub choices: Vec<ChoiceRule>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub default: Presence<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FailState {
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub comment: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub cause: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub error: Presence<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SucceedState {
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub comment: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub input_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub output_path: Presence<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParallelState {
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub comment: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub input_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub output_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub result_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub result_selector: Presence<Payload>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub parameters: Presence<Payload>,
    /// Each branch is a self-contained definition with its own graph closure.
    pub branches: Vec<Definition>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub retry: Presence<Vec<Retrier>>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub catch: Presence<Vec<Catcher>>,
    #[serde(flatten)]
    pub flow: NextOrEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MapState {
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub comment: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub input_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub output_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub result_path: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub result_selector: Presence<Payload>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub parameters: Presence<Payload>,
    pub iterator: Box<Definition>,
    pub items_path: String,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub max_concurrency: Presence<u64>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub retry: Presence<Vec<Retrier>>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub catch: Presence<Vec<Catcher>>,
    #[serde(flatten)]
    pub flow: NextOrEnd,
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Type")]
pub enum State {
    Pass(PassState),
    Task(TaskState),
    Wait(WaitState),
    Choice(ChoiceState),
    Fail(FailState),
    Succeed(SucceedState),
    Parallel(ParallelState),
    Map(MapState),
}

impl State {
    pub fn kind(&self) -> StateKind {
        match self {
            State::Pass(_) => StateKind::Pass,
            State::Task(_) => StateKind::Task,
            State::Wait(_) => StateKind::Wait,
            State::Choice(_) => StateKind::Choice,
            State::Fail(_) => StateKind::Fail,
            State::Succeed(_) => StateKind::Succeed,
            State::Parallel(_) => StateKind::Parallel,
            State::Map(_) => StateKind::Map,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        let comment = match self {
            State::Pass(s) => &s.comment,
            State::Task(s) => &s.comment,
            State::Wait(s) => &s.comment,
            State::Choice(s) => &s.comment,
            State::Fail(s) => &s.comment,
            State::Succeed(s) => &s.comment,
            State::Parallel(s) => &s.comment,
            State::Map(s) => &s.comment,
        };
        comment.as_set().map(String::as_str)
    }

    /// Transition targets labelled by where they were declared, in declaration order.
    /// Nested branches and iterators are not walked; they close over their own graph.
    pub fn labelled_transitions(&self) -> Vec<(TransitionKind, &str)> {
        match self {
            State::Pass(s) => next_only(&s.flow),
            State::Wait(s) => next_only(&s.flow),
            State::Task(s) => next_and_catch(&s.flow, &s.catch),
            State::Parallel(s) => next_and_catch(&s.flow, &s.catch),
            State::Map(s) => next_and_catch(&s.flow, &s.catch),
            State::Choice(s) => {
                let mut out = Vec::with_capacity(s.choices.len() + 1);
                if let Some(default) = s.default.as_set() {
                    out.push((TransitionKind::Default, default.as_str()));
                }
                out.extend(
                    s.choices
                        .iter()
                        .map(|rule| (TransitionKind::Choice, rule.next.as_str())),
                );
                out
            }
            State::Fail(_) | State::Succeed(_) => vec![],
        }
    }

    /// Names of every state this one can hand control to.
    pub fn transitions(&self) -> Vec<&str> {
        self.labelled_transitions()
            .into_iter()
            .map(|(_, target)| target)
            .collect()
    }

    /// Fail and Succeed end the workflow by construction.
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Fail(_) | State::Succeed(_))
    }
}

fn next_only(flow: &NextOrEnd) -> Vec<(TransitionKind, &str)> {
    flow.next()
        .map(|next| vec![(TransitionKind::Next, next)])
        .unwrap_or_default()
}

fn next_and_catch<'a>(
    flow: &'a NextOrEnd,
    catch: &'a Presence<Vec<Catcher>>,
) -> Vec<(TransitionKind, &'a str)> {
    let mut out = next_only(flow);
    if let Some(catchers) = catch.as_set() {
        out.extend(
            catchers
                .iter()
                .map(|c| (TransitionKind::Catch, c.next.as_str())),
        );
    }
    out
}
