//! Tri-state field presence.
//!
//! A definition must re-serialize to exactly the fields its author wrote, so an optional
//! field remembers whether it was omitted, written as `null`, or written with a value.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Presence<T> {
    #[default]
    Absent,
    Null,
    Set(T),
}

impl<T> Presence<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Presence::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Presence::Null)
    }

    /// True only for `Set`. Explicit `null` counts as unset for every exclusivity rule.
    pub fn is_set(&self) -> bool {
        matches!(self, Presence::Set(_))
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Presence::Set(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Presence<U> {
        match self {
            Presence::Absent => Presence::Absent,
            Presence::Null => Presence::Null,
            Presence::Set(value) => Presence::Set(f(value)),
        }
    }
}

impl<T> From<Option<T>> for Presence<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Presence::Set(value),
            None => Presence::Absent,
        }
    }
}

impl<T: Serialize> Serialize for Presence<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Presence::Set(value) => value.serialize(serializer),
            Presence::Absent | Presence::Null => serializer.serialize_none(),
        }
    }
}
