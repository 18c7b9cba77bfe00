//! Form validation and payload assembly.

pub mod payload;
pub mod validate;

pub use payload::build_payload;
pub use validate::{ValidatedAmounts, ValidationError, parse_required_number, validate_form};
