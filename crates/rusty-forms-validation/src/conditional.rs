//! Conditional-requiredness validators
//!
//! A field guarded by one of these validators is optional until its trigger
//! holds. Once the trigger holds the field must have a present value; if it
//! does not, the validator reports its own key together with
//! `required: true`.
//!
//! Validators that look at siblings need a parent group. Without one they
//! report nothing and request a recheck, which the form runs after the field
//! is attached. With a parent they ask the form to revalidate the field
//! whenever one of the referenced siblings changes.
//!
//! # Example
//!
//! ```rust,ignore
//! use rusty_forms_validation::conditional::required_if_all_equal;
//! use serde_json::json;
//!
//! // `genderOther` becomes required once `gender` is "other".
//! let v = required_if_all_equal([("gender", json!("other"))]);
//! ```

use serde_json::Value;

use crate::context::{validator, FieldContext, ValidatorFn};
use crate::errors::ValidationErrors;
use crate::value::strict_equals;

pub const REQUIRED_IF: &str = "requiredIf";
pub const REQUIRED_IF_ANY: &str = "requiredIfAny";
pub const REQUIRED_IF_ALL: &str = "requiredIfAll";
pub const REQUIRED_IF_ANY_EQUAL: &str = "requiredIfAnyEqual";
pub const REQUIRED_IF_ALL_EQUAL: &str = "requiredIfAllEqual";
pub const REQUIRED_IF_PRESENT: &str = "requiredIfPresent";
pub const REQUIRED_WHEN: &str = "requiredWhen";
pub const REQUIRED_IF_EQUAL_TO: &str = "requiredIfEqualTo";

/// A sibling name and the value it has to hold.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch {
    pub name: String,
    pub value: Value,
}

impl FieldMatch {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    fn holds(&self, ctx: &FieldContext<'_>) -> bool {
        ctx.sibling(&self.name)
            .is_some_and(|current| strict_equals(current, &self.value))
    }

    /// `[name, value]`, the payload form of a pair.
    fn to_value(&self) -> Value {
        Value::Array(vec![Value::String(self.name.clone()), self.value.clone()])
    }
}

impl<N: Into<String>, V: Into<Value>> From<(N, V)> for FieldMatch {
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

fn collect_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}

fn collect_matches<I, P>(pairs: I) -> Vec<FieldMatch>
where
    I: IntoIterator<Item = P>,
    P: Into<FieldMatch>,
{
    pairs.into_iter().map(Into::into).collect()
}

/// Shared skeleton of every sibling-dependent validator.
///
/// `trigger` returns the payload when the field is required, `None` when the
/// field is optional.
fn depends_on<F>(key: &'static str, observed: Vec<String>, trigger: F) -> ValidatorFn
where
    F: Fn(&FieldContext<'_>) -> Option<Value> + Send + Sync + 'static,
{
    validator(move |ctx| {
        if !ctx.has_parent() {
            ctx.request_recheck();
            return None;
        }

        ctx.observe(&observed);

        let payload = trigger(ctx)?;
        if ctx.has_value() {
            return None;
        }
        Some(ValidationErrors::required_by(key, payload))
    })
}

fn condition_rule(key: &'static str, condition: bool) -> ValidatorFn {
    validator(move |ctx| {
        (condition && !ctx.has_value()).then(|| ValidationErrors::required_by(key, true))
    })
}

fn any_rule(key: &'static str, names: Vec<String>) -> ValidatorFn {
    depends_on(key, names.clone(), move |ctx| {
        let present: Vec<Value> = names
            .iter()
            .filter(|name| ctx.sibling_present(name))
            .map(|name| Value::String(name.clone()))
            .collect();
        (!present.is_empty()).then_some(Value::Array(present))
    })
}

fn all_rule(key: &'static str, names: Vec<String>) -> ValidatorFn {
    depends_on(key, names.clone(), move |ctx| {
        names
            .iter()
            .all(|name| ctx.sibling_present(name))
            .then(|| Value::Array(names.iter().cloned().map(Value::String).collect()))
    })
}

fn any_equal_rule(key: &'static str, pairs: Vec<FieldMatch>) -> ValidatorFn {
    let observed = pairs.iter().map(|p| p.name.clone()).collect();
    depends_on(key, observed, move |ctx| {
        let matching: Vec<Value> = pairs
            .iter()
            .filter(|pair| pair.holds(ctx))
            .map(FieldMatch::to_value)
            .collect();
        (!matching.is_empty()).then_some(Value::Array(matching))
    })
}

fn all_equal_rule(key: &'static str, pairs: Vec<FieldMatch>) -> ValidatorFn {
    let observed = pairs.iter().map(|p| p.name.clone()).collect();
    depends_on(key, observed, move |ctx| {
        pairs
            .iter()
            .all(|pair| pair.holds(ctx))
            .then(|| Value::Array(pairs.iter().map(FieldMatch::to_value).collect()))
    })
}

fn equal_to_rule(key: &'static str, name: String, expected: Value) -> ValidatorFn {
    depends_on(key, vec![name.clone()], move |ctx| {
        ctx.sibling(&name)
            .is_some_and(|current| strict_equals(current, &expected))
            .then(|| Value::String(name.clone()))
    })
}

/// Required whenever `condition` is true; a filled-in field satisfies it.
/// Does not look at siblings.
pub fn required_if(condition: bool) -> ValidatorFn {
    condition_rule(REQUIRED_IF, condition)
}

/// Required if any of `names` holds a present value. The payload lists the
/// siblings that triggered it.
pub fn required_if_any<I, S>(names: I) -> ValidatorFn
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    any_rule(REQUIRED_IF_ANY, collect_names(names))
}

/// Required if every one of `names` holds a present value.
pub fn required_if_all<I, S>(names: I) -> ValidatorFn
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    all_rule(REQUIRED_IF_ALL, collect_names(names))
}

/// Required if any `(name, value)` pair matches. The payload lists the
/// matching pairs.
pub fn required_if_any_equal<I, P>(pairs: I) -> ValidatorFn
where
    I: IntoIterator<Item = P>,
    P: Into<FieldMatch>,
{
    any_equal_rule(REQUIRED_IF_ANY_EQUAL, collect_matches(pairs))
}

/// Required if every `(name, value)` pair matches. The payload lists all
/// configured pairs.
pub fn required_if_all_equal<I, P>(pairs: I) -> ValidatorFn
where
    I: IntoIterator<Item = P>,
    P: Into<FieldMatch>,
{
    all_equal_rule(REQUIRED_IF_ALL_EQUAL, collect_matches(pairs))
}

/// Required if the sibling `name` holds a present value.
pub fn required_if_present(name: impl Into<String>) -> ValidatorFn {
    let name = name.into();
    depends_on(REQUIRED_IF_PRESENT, vec![name.clone()], move |ctx| {
        ctx.sibling_present(&name)
            .then(|| Value::String(name.clone()))
    })
}

/// Required if the sibling `name` equals `expected`.
pub fn required_when(name: impl Into<String>, expected: impl Into<Value>) -> ValidatorFn {
    equal_to_rule(REQUIRED_WHEN, name.into(), expected.into())
}

/// [`required_when`] reporting under the `requiredIfEqualTo` key.
pub fn required_if_equal_to(name: impl Into<String>, expected: impl Into<Value>) -> ValidatorFn {
    equal_to_rule(REQUIRED_IF_EQUAL_TO, name.into(), expected.into())
}

// Short names. Each reports under its own short key (`if`, `any`, ...).

pub fn r#if(condition: bool) -> ValidatorFn {
    condition_rule("if", condition)
}

pub fn any<I, S>(names: I) -> ValidatorFn
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    any_rule("any", collect_names(names))
}

pub fn all<I, S>(names: I) -> ValidatorFn
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    all_rule("all", collect_names(names))
}

pub fn any_equal<I, P>(pairs: I) -> ValidatorFn
where
    I: IntoIterator<Item = P>,
    P: Into<FieldMatch>,
{
    any_equal_rule("anyEqual", collect_matches(pairs))
}

pub fn all_equal<I, P>(pairs: I) -> ValidatorFn
where
    I: IntoIterator<Item = P>,
    P: Into<FieldMatch>,
{
    all_equal_rule("allEqual", collect_matches(pairs))
}
