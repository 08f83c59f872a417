//! Typed, validated representation of a States Language document.

pub mod choice;
pub mod definition;
pub mod handlers;
pub mod path;
pub mod presence;
pub mod state;

pub use choice::*;
pub use definition::Definition;
pub use handlers::{Catcher, Retrier};
pub use path::FieldPath;
pub use presence::Presence;
pub use state::*;
