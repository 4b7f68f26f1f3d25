//! Numeric validation functions

use serde_json::Value;

use crate::context::{validator, ValidatorFn};
use crate::errors::ValidationErrors;
use crate::value::{as_finite_number, number_value};

pub const OUT_OF_RANGE: &str = "outOfRange";

/// Checks `start <= value < end`.
///
/// Values that cannot be read as a finite number (null, blank, non-numeric
/// text) are not range-checked at all.
pub fn check_range(value: &Value, start: f64, end: f64) -> Option<ValidationErrors> {
    let n = as_finite_number(value)?;
    if n >= start && n < end {
        return None;
    }

    Some(
        ValidationErrors::single(OUT_OF_RANGE, true)
            .with("range", vec![number_value(start), number_value(end)])
            .with("value", value.clone()),
    )
}

/// Validator for the half-open range `[start, end)`.
pub fn in_range(start: f64, end: f64) -> ValidatorFn {
    validator(move |ctx| check_range(ctx.value(), start, end))
}

/// Alias of [`in_range`].
pub fn range(start: f64, end: f64) -> ValidatorFn {
    in_range(start, end)
}
