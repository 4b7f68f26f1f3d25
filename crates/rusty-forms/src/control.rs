// File: src/control.rs
// Purpose: A single form field holding a value, its validators and the last result

use std::fmt;

use rusty_forms_validation::{FieldContext, ValidationErrors, ValidatorFn};
use serde_json::Value;

/// One field.
///
/// A control created on its own validates without a parent. Validators that
/// need siblings then leave a pending recheck on the control, which the group
/// picks up when the control is added to it.
pub struct FormControl {
    pub(crate) value: Value,
    pub(crate) validators: Vec<ValidatorFn>,
    pub(crate) errors: Option<ValidationErrors>,
    pending_recheck: bool,
}

impl FormControl {
    /// Create a control and run its validators once.
    pub fn new<V, I>(value: V, validators: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = ValidatorFn>,
    {
        let mut control = Self {
            value: value.into(),
            validators: validators.into_iter().collect(),
            errors: None,
            pending_recheck: false,
        };
        control.validate_detached();
        control
    }

    /// Control without validators.
    pub fn plain(value: impl Into<Value>) -> Self {
        Self::new(value, [])
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn errors(&self) -> Option<&ValidationErrors> {
        self.errors.as_ref()
    }

    pub fn has_error(&self, key: &str) -> bool {
        self.errors.as_ref().is_some_and(|e| e.contains_key(key))
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_none()
    }

    /// Set the value of a control that is not in a group and revalidate it.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
        self.validate_detached();
    }

    /// Add a validator. It runs on the next validation pass.
    pub fn add_validator(&mut self, validator: ValidatorFn) {
        self.validators.push(validator);
    }

    pub fn has_pending_recheck(&self) -> bool {
        self.pending_recheck
    }

    pub(crate) fn take_pending_recheck(&mut self) -> bool {
        std::mem::take(&mut self.pending_recheck)
    }

    fn validate_detached(&mut self) {
        let ctx = FieldContext::detached(&self.value);
        let errors = collect_errors(&self.validators, &ctx);
        let effects = ctx.into_effects();

        self.errors = errors;
        if effects.recheck_requested {
            tracing::trace!("detached control requested a recheck");
            self.pending_recheck = true;
        }
    }
}

impl fmt::Debug for FormControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormControl")
            .field("value", &self.value)
            .field("validators", &self.validators.len())
            .field("errors", &self.errors)
            .field("pending_recheck", &self.pending_recheck)
            .finish()
    }
}

/// Run every validator and merge their entries. `None` when all pass.
pub(crate) fn collect_errors(
    validators: &[ValidatorFn],
    ctx: &FieldContext<'_>,
) -> Option<ValidationErrors> {
    let mut merged = ValidationErrors::new();
    for validator in validators {
        if let Some(errors) = validator(ctx) {
            merged.merge(errors);
        }
    }
    (!merged.is_empty()).then_some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rusty_forms_validation::{in_range, required, required_if, required_if_any};
    use serde_json::json;

    #[test]
    fn test_validates_on_creation() {
        let control = FormControl::new(json!(""), [required_if(true)]);
        assert_eq!(
            control.errors().cloned().map(ValidationErrors::into_value),
            Some(json!({"requiredIf": true, "required": true}))
        );
        assert!(!control.has_pending_recheck());
    }

    #[test]
    fn test_set_value_revalidates() {
        let mut control = FormControl::new(json!(100), [in_range(18.0, 100.0)]);
        assert!(control.has_error("outOfRange"));

        control.set_value(99);
        assert!(control.is_valid());

        control.set_value(17);
        assert_eq!(
            control.errors().cloned().map(ValidationErrors::into_value),
            Some(json!({"outOfRange": true, "range": [18, 100], "value": 17}))
        );
    }

    #[test]
    fn test_detached_conditional_leaves_pending_recheck() {
        let mut control = FormControl::new(json!(""), [required_if_any(["lastName"])]);
        assert!(control.is_valid());
        assert!(control.has_pending_recheck());
        assert!(control.take_pending_recheck());
        assert!(!control.has_pending_recheck());
    }

    #[test]
    fn test_errors_merge_across_validators() {
        let control = FormControl::new(Value::Null, [required(), required_if(true)]);
        let errors = control.errors().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("required"));
        assert!(errors.contains_key("requiredIf"));
    }

    #[test]
    fn test_added_validator_runs_on_next_pass() {
        let mut control = FormControl::plain("");
        control.add_validator(required());
        assert!(control.is_valid());
        control.set_value("");
        assert!(control.has_error("required"));
    }
}
