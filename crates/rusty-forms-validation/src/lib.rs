//! rusty-forms validators
//!
//! Validator factories for reactive forms. Each factory captures its
//! configuration and returns a [`ValidatorFn`] that the form calls with a
//! [`FieldContext`] for the field being validated.
//!
//! - [`conditional`] - fields that become required depending on sibling values
//! - [`numeric`] - half-open numeric ranges
//! - [`address`], [`states`] - US postal address parts
//! - [`builtin`] - required / email / pattern
//!
//! No validator panics on unexpected input. Anything that cannot be checked
//! is reported as valid.

pub mod address;
pub mod builtin;
pub mod conditional;
pub mod context;
pub mod errors;
pub mod numeric;
pub mod states;
pub mod value;

pub use address::{street_address, zip_code};
pub use builtin::{email, pattern, required};
pub use conditional::{
    required_if, required_if_all, required_if_all_equal, required_if_any, required_if_any_equal,
    required_if_equal_to, required_if_present, required_when, FieldMatch,
};
pub use context::{validator, FieldContext, SiblingLookup, ValidationEffects, ValidatorFn};
pub use errors::ValidationErrors;
pub use numeric::{in_range, range};
pub use states::{state_code, state_name};
pub use value::{is_present, strict_equals};
