//! Validation result map

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error key that accompanies every triggered conditional validator.
pub const REQUIRED: &str = "required";

/// Errors reported for a single field, keyed by validator name.
///
/// Each validator contributes its own keys; the form merges the maps of all
/// validators on a field. An empty map never leaves a validator, so "no
/// errors" is always `None` on the validator side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Map<String, Value>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// A map holding one entry.
    pub fn single(key: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self::new().with(key, payload)
    }

    /// The `{<key>: payload, required: true}` shape produced by the
    /// conditional validators.
    pub fn required_by(key: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self::single(key, payload).with(REQUIRED, true)
    }

    pub fn with(mut self, key: impl Into<String>, payload: impl Into<Value>) -> Self {
        self.insert(key, payload);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, payload: impl Into<Value>) {
        self.0.insert(key.into(), payload.into());
    }

    /// Merge another map into this one. Keys already present are overwritten.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ValidationErrors {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<ValidationErrors> for Value {
    fn from(errors: ValidationErrors) -> Self {
        errors.into_value()
    }
}
