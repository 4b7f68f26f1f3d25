//! The validator's view of a field
//!
//! A validator never touches the form directly. The form builds a
//! [`FieldContext`] for the field being validated, hands it to every
//! validator, and afterwards collects the [`ValidationEffects`] the
//! validators asked for: which siblings to observe, and whether the field
//! needs another pass once it is attached to a group.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use serde_json::Value;

use crate::errors::ValidationErrors;
use crate::value::is_present;

/// A validator: `None` when valid, otherwise the error entries it contributes.
pub type ValidatorFn = Arc<dyn Fn(&FieldContext<'_>) -> Option<ValidationErrors> + Send + Sync>;

/// Wrap a closure as a [`ValidatorFn`].
pub fn validator<F>(f: F) -> ValidatorFn
where
    F: Fn(&FieldContext<'_>) -> Option<ValidationErrors> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Sibling lookup relative to the field's parent group.
pub trait SiblingLookup {
    /// Current value of the named sibling, `None` if the group has no such field.
    fn sibling_value(&self, name: &str) -> Option<&Value>;
}

/// Side requests recorded while validating one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationEffects {
    /// Sibling names the field wants to be revalidated on, in request order.
    pub observed: Vec<String>,
    /// The field was validated without a parent and must be checked again
    /// after attachment.
    pub recheck_requested: bool,
}

pub struct FieldContext<'a> {
    value: &'a Value,
    parent: Option<&'a dyn SiblingLookup>,
    observed: RefCell<Vec<String>>,
    recheck: Cell<bool>,
}

impl<'a> FieldContext<'a> {
    /// Context for a field that is not attached to any group.
    pub fn detached(value: &'a Value) -> Self {
        Self::build(value, None)
    }

    /// Context for a field inside a group.
    pub fn attached(value: &'a Value, parent: &'a dyn SiblingLookup) -> Self {
        Self::build(value, Some(parent))
    }

    fn build(value: &'a Value, parent: Option<&'a dyn SiblingLookup>) -> Self {
        Self {
            value,
            parent,
            observed: RefCell::new(Vec::new()),
            recheck: Cell::new(false),
        }
    }

    pub fn value(&self) -> &Value {
        self.value
    }

    pub fn has_value(&self) -> bool {
        is_present(self.value)
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Sibling value; a missing parent or missing sibling both yield `None`.
    pub fn sibling(&self, name: &str) -> Option<&Value> {
        self.parent.and_then(|p| p.sibling_value(name))
    }

    /// Whether the named sibling exists and holds a present value.
    pub fn sibling_present(&self, name: &str) -> bool {
        self.sibling(name).is_some_and(is_present)
    }

    /// Ask to be revalidated whenever one of `names` changes.
    pub fn observe<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut observed = self.observed.borrow_mut();
        for name in names {
            let name = name.as_ref();
            if !observed.iter().any(|n| n == name) {
                observed.push(name.to_string());
            }
        }
    }

    /// Ask for another validation pass once the field has a parent.
    pub fn request_recheck(&self) {
        self.recheck.set(true);
    }

    pub fn into_effects(self) -> ValidationEffects {
        ValidationEffects {
            observed: self.observed.into_inner(),
            recheck_requested: self.recheck.get(),
        }
    }
}

impl SiblingLookup for serde_json::Map<String, Value> {
    fn sibling_value(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl SiblingLookup for std::collections::HashMap<String, Value> {
    fn sibling_value(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}
