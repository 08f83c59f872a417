//! Validation rules shared by every constructor.
//!
//! `primitives` check single values, `combinators` check groups of fields on one object,
//! and `structural` checks a whole definition once its states are built.

pub mod combinators;
pub mod primitives;
pub mod structural;

pub use combinators::{require_at_most_one, require_exactly_one};
pub use primitives::{check_iso8601, check_json_path, check_non_empty};
pub use structural::validate_transitions;
