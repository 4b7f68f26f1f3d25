// File: src/registry.rs
// Purpose: Which fields get revalidated when a sibling changes

use std::collections::{BTreeSet, HashMap};

use crate::group::FieldId;

/// Field → observed sibling names, and the reverse index.
///
/// Entries are keyed by sibling *name*, so a field can observe a sibling that
/// is not in the group yet and still be revalidated once it is added.
#[derive(Debug, Default, Clone)]
pub struct DependencyRegistry {
    dependencies: HashMap<FieldId, BTreeSet<String>>,
    dependents: HashMap<String, BTreeSet<FieldId>>,
}

impl DependencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `field` observes `sibling`. Returns `false` if it already did.
    pub fn register(&mut self, field: FieldId, sibling: &str) -> bool {
        let added = self
            .dependencies
            .entry(field)
            .or_default()
            .insert(sibling.to_string());
        if added {
            self.dependents
                .entry(sibling.to_string())
                .or_default()
                .insert(field);
        }
        added
    }

    pub fn observes(&self, field: FieldId, sibling: &str) -> bool {
        self.dependencies
            .get(&field)
            .is_some_and(|names| names.contains(sibling))
    }

    /// Sibling names `field` observes, sorted.
    pub fn dependencies_of(&self, field: FieldId) -> Vec<&str> {
        self.dependencies
            .get(&field)
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Fields observing `sibling`, oldest first.
    pub fn dependents_of(&self, sibling: &str) -> Vec<FieldId> {
        self.dependents
            .get(sibling)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Drop everything `field` observes.
    pub fn forget(&mut self, field: FieldId) {
        let Some(names) = self.dependencies.remove(&field) else {
            return;
        };
        for name in names {
            if let Some(ids) = self.dependents.get_mut(&name) {
                ids.remove(&field);
                if ids.is_empty() {
                    self.dependents.remove(&name);
                }
            }
        }
    }

    /// Number of (field, sibling) pairs.
    pub fn len(&self) -> usize {
        self.dependencies.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
