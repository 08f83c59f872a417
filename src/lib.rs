pub mod config;
pub mod error;
pub mod graph;
pub mod model;
pub mod parse;
pub mod validate;
pub mod wasm;

pub use config::{ErrorMode, Reachability, ValidationOptions};
pub use error::{ErrorKind, ValidationError, ValidationErrors};
pub use graph::TransitionGraph;
pub use model::{Definition, State, StateKind};
pub use parse::{FromDocument, parse, parse_with};
