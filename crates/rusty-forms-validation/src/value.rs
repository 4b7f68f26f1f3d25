//! Value helpers shared by every validator
//!
//! Field values are plain `serde_json::Value`s. The helpers here define the
//! one truthiness rule, the equality used by the `*_equal` validators, and the
//! numeric coercion used by the range validator.

use serde_json::Value;

/// Returns `true` when a value counts as "filled in".
///
/// `null`, `""`, `0` and `false` are absent. Everything else is present,
/// including empty arrays and objects.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Same-kind equality. Numbers compare by numeric value so that `1` and `1.0`
/// match; arrays and objects compare structurally.
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| strict_equals(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|other| strict_equals(v, other)))
        }
        _ => left == right,
    }
}

/// Coerces a value to a finite number.
///
/// Returns `None` for anything that should not take part in a numeric
/// comparison: `null`, blank strings, unparsable strings, non-finite results,
/// arrays and objects.
pub fn as_finite_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    n.is_finite().then_some(n)
}

/// Converts a bound back into JSON, keeping integral numbers as integers so
/// that `18.0` renders as `18` in error payloads.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// Borrow a value as a string slice, if it is one.
pub(crate) fn as_text(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_present() {
        assert!(!is_present(&Value::Null));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!(0.0)));
        assert!(!is_present(&json!(false)));

        assert!(is_present(&json!("a")));
        assert!(is_present(&json!(" ")));
        assert!(is_present(&json!(-1)));
        assert!(is_present(&json!(true)));
        assert!(is_present(&json!([])));
        assert!(is_present(&json!({})));
    }

    #[test]
    fn test_strict_equals() {
        assert!(strict_equals(&json!("other"), &json!("other")));
        assert!(strict_equals(&json!(1), &json!(1.0)));
        assert!(strict_equals(&json!(true), &json!(true)));
        assert!(strict_equals(&Value::Null, &Value::Null));
        assert!(strict_equals(&json!({"a": [1, 2]}), &json!({"a": [1.0, 2]})));

        assert!(!strict_equals(&json!("1"), &json!(1)));
        assert!(!strict_equals(&json!(true), &json!("true")));
        assert!(!strict_equals(&json!(""), &Value::Null));
        assert!(!strict_equals(&json!([1]), &json!([1, 2])));
    }

    #[test]
    fn test_as_finite_number() {
        assert_eq!(as_finite_number(&json!(17)), Some(17.0));
        assert_eq!(as_finite_number(&json!(" 42 ")), Some(42.0));
        assert_eq!(as_finite_number(&json!("2.5")), Some(2.5));
        assert_eq!(as_finite_number(&json!(true)), Some(1.0));

        assert_eq!(as_finite_number(&Value::Null), None);
        assert_eq!(as_finite_number(&json!("")), None);
        assert_eq!(as_finite_number(&json!("   ")), None);
        assert_eq!(as_finite_number(&json!("abc")), None);
        assert_eq!(as_finite_number(&json!("inf")), None);
        assert_eq!(as_finite_number(&json!([5])), None);
    }

    #[test]
    fn test_number_value_keeps_integers() {
        assert_eq!(number_value(18.0), json!(18));
        assert_eq!(number_value(2.5), json!(2.5));
    }
}
