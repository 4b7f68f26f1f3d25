//! Plain validators every form needs alongside the cross-field ones

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use crate::context::{validator, ValidatorFn};
use crate::errors::{ValidationErrors, REQUIRED};
use crate::value::as_text;

pub const EMAIL: &str = "email";
pub const PATTERN: &str = "pattern";

// Email validation regex
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Null, `""` and `[]` count as not filled in. `false` and `0` are answers.
pub fn is_empty_input(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// `{required: true}` for an empty input.
pub fn required() -> ValidatorFn {
    validator(|ctx| {
        is_empty_input(ctx.value()).then(|| ValidationErrors::single(REQUIRED, true))
    })
}

/// `{email: true}` for a non-empty string that is not an email address.
pub fn email() -> ValidatorFn {
    validator(|ctx| match as_text(ctx.value()) {
        Some(s) if !s.is_empty() && !is_valid_email(s) => {
            Some(ValidationErrors::single(EMAIL, true))
        }
        _ => None,
    })
}

/// Whole-value regex match. The pattern is anchored if it is not already.
pub fn pattern(source: &str) -> Result<ValidatorFn, regex::Error> {
    let anchored = anchor(source);
    let regex = Regex::new(&anchored)?;

    Ok(validator(move |ctx| {
        let actual = as_text(ctx.value())?;
        if actual.is_empty() || regex.is_match(actual) {
            return None;
        }
        Some(ValidationErrors::single(
            PATTERN,
            json!({"requiredPattern": anchored, "actualValue": actual}),
        ))
    }))
}

fn anchor(source: &str) -> String {
    let mut anchored = String::with_capacity(source.len() + 2);
    if !source.starts_with('^') {
        anchored.push('^');
    }
    anchored.push_str(source);
    if !source.ends_with('$') {
        anchored.push('$');
    }
    anchored
}
