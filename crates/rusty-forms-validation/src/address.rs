//! Postal address validators

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::{validator, ValidatorFn};
use crate::errors::ValidationErrors;
use crate::value::as_text;

pub const ZIP_CODE: &str = "zipCode";
pub const STREET_ADDRESS: &str = "streetAddress";

// 5 digits, optionally followed by -4 digits
static ZIP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").unwrap());

// house number, optional unit suffix ("789-B"), then the street
static STREET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(-[A-Za-z0-9]+)?\s+[A-Za-z0-9\s.,#-]+$").unwrap());

pub fn is_zip_code(value: &str) -> bool {
    ZIP_REGEX.is_match(value)
}

pub fn is_street_address(value: &str) -> bool {
    STREET_REGEX.is_match(value)
}

fn text_rule(key: &'static str, accepts: fn(&str) -> bool) -> ValidatorFn {
    validator(move |ctx| match as_text(ctx.value()) {
        Some(s) if !s.is_empty() && !accepts(s) => Some(ValidationErrors::single(key, true)),
        _ => None,
    })
}

/// US zip code, `12345` or `12345-6789`. Empty passes.
pub fn zip_code() -> ValidatorFn {
    text_rule(ZIP_CODE, is_zip_code)
}

/// Street line starting with a house number. Empty passes.
pub fn street_address() -> ValidatorFn {
    text_rule(STREET_ADDRESS, is_street_address)
}
