//! US state and territory lookups

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::context::{validator, ValidatorFn};
use crate::errors::ValidationErrors;
use crate::value::as_text;

pub const STATE_CODE: &str = "stateCode";
pub const STATE_NAME: &str = "stateName";

/// Two-letter code and full name for every state, DC, the inhabited
/// territories, the freely associated states and the military mail codes.
pub static US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
    ("DC", "District of Columbia"),
    ("AS", "American Samoa"),
    ("GU", "Guam"),
    ("MP", "Northern Mariana Islands"),
    ("PR", "Puerto Rico"),
    ("VI", "Virgin Islands"),
    ("UM", "United States Minor Outlying Islands"),
    ("FM", "Federated States of Micronesia"),
    ("MH", "Marshall Islands"),
    ("PW", "Palau"),
    ("AA", "Armed Forces Americas"),
    ("AE", "Armed Forces Europe"),
    ("AP", "Armed Forces Pacific"),
];

static CODES: Lazy<HashSet<String>> =
    Lazy::new(|| US_STATES.iter().map(|(code, _)| code.to_lowercase()).collect());

static NAMES: Lazy<HashSet<String>> =
    Lazy::new(|| US_STATES.iter().map(|(_, name)| name.to_lowercase()).collect());

/// Case-insensitive two-letter code check.
pub fn is_state_code(value: &str) -> bool {
    CODES.contains(&value.to_lowercase())
}

/// Case-insensitive full name check.
pub fn is_state_name(value: &str) -> bool {
    NAMES.contains(&value.to_lowercase())
}

/// Empty values and non-strings pass; any other string must be a known code.
pub fn state_code() -> ValidatorFn {
    validator(|ctx| match as_text(ctx.value()) {
        Some(s) if !s.is_empty() && !is_state_code(s) => {
            Some(ValidationErrors::single(STATE_CODE, true))
        }
        _ => None,
    })
}

/// Empty values and non-strings pass; any other string must be a known name.
pub fn state_name() -> ValidatorFn {
    validator(|ctx| match as_text(ctx.value()) {
        Some(s) if !s.is_empty() && !is_state_name(s) => {
            Some(ValidationErrors::single(STATE_NAME, true))
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FieldContext;
    use serde_json::{json, Value};

    fn run(v: ValidatorFn, value: Value) -> Option<Value> {
        v(&FieldContext::detached(&value)).map(ValidationErrors::into_value)
    }

    #[test]
    fn test_table_is_consistent() {
        assert_eq!(CODES.len(), US_STATES.len());
        assert_eq!(NAMES.len(), US_STATES.len());
        assert!(US_STATES.iter().all(|(code, _)| code.len() == 2));
    }

    #[test]
    fn test_state_code() {
        assert_eq!(run(state_code(), json!("Ct")), None);
        assert_eq!(run(state_code(), json!("ny")), None);
        assert_eq!(run(state_code(), json!("PR")), None);
        assert_eq!(run(state_code(), json!("")), None);
        assert_eq!(run(state_code(), Value::Null), None);

        assert_eq!(run(state_code(), json!("AF")), Some(json!({"stateCode": true})));
        assert_eq!(run(state_code(), json!("C T")), Some(json!({"stateCode": true})));
    }

    #[test]
    fn test_state_name() {
        assert_eq!(run(state_name(), json!("New YORK")), None);
        assert_eq!(run(state_name(), json!("district of columbia")), None);
        assert_eq!(run(state_name(), json!("")), None);

        assert_eq!(run(state_name(), json!("Orlando")), Some(json!({"stateName": true})));
        assert_eq!(run(state_name(), json!("NY")), Some(json!({"stateName": true})));
    }
}
