// File: src/group.rs
// Purpose: Group of named controls, dependency-driven revalidation and deferred rechecks

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;

use rusty_forms_validation::{FieldContext, SiblingLookup, ValidationErrors};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::FormConfig;
use crate::control::{collect_errors, FormControl};
use crate::error::{FormError, FormResult};
use crate::registry::DependencyRegistry;

/// Stable identity of a control within its group. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(usize);

impl FieldId {
    pub(crate) fn new(raw: usize) -> Self {
        Self(raw)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle returned by [`FormGroup::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Options for a revalidation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevalidateOptions {
    /// Announce the pass as a change: notify subscribers and revalidate the
    /// field's own dependents.
    pub emit_event: bool,
}

impl RevalidateOptions {
    pub fn silent() -> Self {
        Self { emit_event: false }
    }

    pub fn notify() -> Self {
        Self { emit_event: true }
    }
}

impl Default for RevalidateOptions {
    fn default() -> Self {
        Self::notify()
    }
}

type Callback = Box<dyn FnMut(&Value)>;

struct Slot {
    id: FieldId,
    name: String,
    control: FormControl,
}

struct Subscriber {
    id: SubscriptionId,
    field: FieldId,
    callback: Callback,
}

struct Siblings<'a>(&'a [Slot]);

impl<'a> Siblings<'a> {
    /// Value borrowed from the slots, not from the wrapper.
    fn find(&self, name: &str) -> Option<&'a Value> {
        self.0
            .iter()
            .find(|slot| slot.name == name)
            .map(|slot| &slot.control.value)
    }
}

impl SiblingLookup for Siblings<'_> {
    fn sibling_value(&self, name: &str) -> Option<&Value> {
        self.find(name)
    }
}

/// A set of named controls validated against each other.
pub struct FormGroup {
    config: FormConfig,
    slots: Vec<Slot>,
    registry: DependencyRegistry,
    pending: VecDeque<FieldId>,
    subscribers: Vec<Subscriber>,
    next_field: usize,
    next_subscription: u64,
}

impl FormGroup {
    pub fn new(config: FormConfig) -> Self {
        Self {
            config,
            slots: Vec::new(),
            registry: DependencyRegistry::new(),
            pending: VecDeque::new(),
            subscribers: Vec::new(),
            next_field: 0,
            next_subscription: 0,
        }
    }

    pub fn builder() -> FormGroupBuilder {
        FormGroupBuilder::default()
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Attach a control under `name`.
    ///
    /// Fields already observing `name` are revalidated, and with `auto_flush`
    /// on the recheck queue is drained before returning.
    pub fn add_control(&mut self, name: impl Into<String>, control: FormControl) -> FormResult<FieldId> {
        let id = self.attach(name.into(), control)?;
        if self.config.recheck.auto_flush {
            self.flush_pending();
        }
        Ok(id)
    }

    fn attach(&mut self, name: String, mut control: FormControl) -> FormResult<FieldId> {
        if self.position(&name).is_some() {
            return Err(FormError::DuplicateControl(name));
        }

        let id = FieldId::new(self.next_field);
        self.next_field += 1;

        if control.take_pending_recheck() {
            debug!(field = %name, %id, "queued recheck for newly attached control");
            self.pending.push_back(id);
        }
        self.slots.push(Slot {
            id,
            name: name.clone(),
            control,
        });

        self.revalidate_dependents(&name);
        Ok(id)
    }

    /// Detach and return the control named `name`.
    ///
    /// Its dependencies and subscriptions are dropped, and fields that
    /// observed it are revalidated against its absence.
    pub fn remove_control(&mut self, name: &str) -> FormResult<FormControl> {
        let index = self.index_of(name)?;
        let slot = self.slots.remove(index);

        self.registry.forget(slot.id);
        self.subscribers.retain(|s| s.field != slot.id);
        self.pending.retain(|id| *id != slot.id);
        debug!(field = %name, id = %slot.id, "removed control");

        self.revalidate_dependents(name);
        Ok(slot.control)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn id_of(&self, name: &str) -> Option<FieldId> {
        self.position(name).map(|i| self.slots[i].id)
    }

    // ------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------

    pub fn get(&self, name: &str) -> Option<&FormControl> {
        self.position(name).map(|i| &self.slots[i].control)
    }

    /// Value of the named control, relative to this group.
    pub fn sibling(&self, name: &str) -> Option<&Value> {
        Siblings(&self.slots).find(name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.sibling(name)
    }

    pub fn errors(&self, name: &str) -> Option<&ValidationErrors> {
        self.get(name).and_then(FormControl::errors)
    }

    pub fn is_valid(&self) -> bool {
        self.slots.iter().all(|slot| slot.control.is_valid())
    }

    /// All values as one JSON object.
    pub fn value_map(&self) -> Map<String, Value> {
        self.slots
            .iter()
            .map(|slot| (slot.name.clone(), slot.control.value.clone()))
            .collect()
    }

    /// Errors of every invalid control, by name.
    pub fn errors_map(&self) -> BTreeMap<String, ValidationErrors> {
        self.slots
            .iter()
            .filter_map(|slot| {
                slot.control
                    .errors
                    .clone()
                    .map(|errors| (slot.name.clone(), errors))
            })
            .collect()
    }

    pub fn registry(&self) -> &DependencyRegistry {
        &self.registry
    }

    // ------------------------------------------------------------------
    // Writing and revalidation
    // ------------------------------------------------------------------

    /// Set a value, validate it and announce the change.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> FormResult<()> {
        let index = self.index_of(name)?;
        self.slots[index].control.value = value.into();
        self.revalidate(index, RevalidateOptions::notify());
        Ok(())
    }

    /// Revalidate the named control without changing its value.
    pub fn update_value_and_validity(&mut self, name: &str, options: RevalidateOptions) -> FormResult<()> {
        let index = self.index_of(name)?;
        self.revalidate(index, options);
        Ok(())
    }

    /// Validate every control once, in insertion order, without notifications.
    pub fn validate_all(&mut self) {
        for index in 0..self.slots.len() {
            self.validate_slot(index);
        }
    }

    fn revalidate(&mut self, index: usize, options: RevalidateOptions) {
        self.validate_slot(index);
        if options.emit_event {
            let id = self.slots[index].id;
            self.emit_change(id);
        }
    }

    /// Notify subscribers of `origin` and revalidate everything observing it.
    ///
    /// Dependents are revalidated silently unless `revalidation.emit_event`
    /// is set, in which case each dependent announces its own pass once.
    fn emit_change(&mut self, origin: FieldId) {
        let mut announced = HashSet::from([origin]);
        let mut queue = VecDeque::from([origin]);

        while let Some(changed) = queue.pop_front() {
            let Some(index) = self.position_of_id(changed) else {
                continue;
            };
            self.notify_subscribers(index);

            let name = self.slots[index].name.clone();
            for dependent in self.registry.dependents_of(&name) {
                let Some(dep_index) = self.position_of_id(dependent) else {
                    continue;
                };
                trace!(sibling = %name, field = %self.slots[dep_index].name, "revalidating dependent");
                self.validate_slot(dep_index);

                if self.config.revalidation.emit_event && announced.insert(dependent) {
                    queue.push_back(dependent);
                }
            }
        }
    }

    /// Silent revalidation of every field observing `name`.
    fn revalidate_dependents(&mut self, name: &str) {
        for dependent in self.registry.dependents_of(name) {
            if let Some(index) = self.position_of_id(dependent) {
                self.validate_slot(index);
            }
        }
    }

    /// Run the validators of one control and apply what they asked for.
    fn validate_slot(&mut self, index: usize) {
        let (errors, effects) = {
            let slot = &self.slots[index];
            let siblings = Siblings(&self.slots);
            let ctx = FieldContext::attached(&slot.control.value, &siblings);
            let errors = collect_errors(&slot.control.validators, &ctx);
            (errors, ctx.into_effects())
        };

        let id = self.slots[index].id;
        for sibling in &effects.observed {
            if self.registry.register(id, sibling) {
                debug!(field = %self.slots[index].name, %sibling, "registered dependency");
            }
        }
        if effects.recheck_requested && !self.pending.contains(&id) {
            trace!(field = %self.slots[index].name, "attached control requested a recheck");
            self.pending.push_back(id);
        }

        self.slots[index].control.errors = errors;
    }

    // ------------------------------------------------------------------
    // Deferred rechecks
    // ------------------------------------------------------------------

    /// Number of queued rechecks.
    pub fn pending_rechecks(&self) -> usize {
        self.pending.len()
    }

    /// Run the rechecks queued so far, oldest first. Rechecks queued while
    /// draining wait for the next call. Returns how many controls were
    /// revalidated.
    pub fn flush_pending(&mut self) -> usize {
        let batch = self.pending.len();
        let mut ran = 0;

        for _ in 0..batch {
            let Some(id) = self.pending.pop_front() else {
                break;
            };
            if let Some(index) = self.position_of_id(id) {
                self.validate_slot(index);
                ran += 1;
            }
        }

        if ran > 0 {
            debug!(ran, "flushed pending rechecks");
        }
        ran
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Call `callback` with the new value every time the named control
    /// announces a change.
    pub fn subscribe<F>(&mut self, name: &str, callback: F) -> FormResult<SubscriptionId>
    where
        F: FnMut(&Value) + 'static,
    {
        let index = self.index_of(name)?;
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        self.subscribers.push(Subscriber {
            id,
            field: self.slots[index].id,
            callback: Box::new(callback),
        });
        Ok(id)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    fn notify_subscribers(&mut self, index: usize) {
        let slot = &self.slots[index];
        for subscriber in self.subscribers.iter_mut().filter(|s| s.field == slot.id) {
            (subscriber.callback)(&slot.control.value);
        }
    }

    // ------------------------------------------------------------------
    // Lookup helpers
    // ------------------------------------------------------------------

    fn position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.name == name)
    }

    fn position_of_id(&self, id: FieldId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    fn index_of(&self, name: &str) -> FormResult<usize> {
        self.position(name)
            .ok_or_else(|| FormError::UnknownControl(name.to_string()))
    }
}

impl Default for FormGroup {
    fn default() -> Self {
        Self::new(FormConfig::default())
    }
}

impl fmt::Debug for FormGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormGroup")
            .field("config", &self.config)
            .field(
                "controls",
                &self
                    .slots
                    .iter()
                    .map(|slot| (&slot.name, &slot.control))
                    .collect::<Vec<_>>(),
            )
            .field("registry", &self.registry)
            .field("pending", &self.pending)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Builds a group from controls declared up front.
///
/// All controls are attached before any recheck runs, so conditional
/// validators see every sibling on their first real pass.
#[derive(Default)]
pub struct FormGroupBuilder {
    config: FormConfig,
    controls: Vec<(String, FormControl)>,
}

impl FormGroupBuilder {
    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    pub fn control(mut self, name: impl Into<String>, control: FormControl) -> Self {
        self.controls.push((name.into(), control));
        self
    }

    pub fn build(self) -> FormResult<FormGroup> {
        let mut group = FormGroup::new(self.config);
        for (name, control) in self.controls {
            group.attach(name, control)?;
        }
        if group.config.recheck.auto_flush {
            group.flush_pending();
        }
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rusty_forms_validation::{required, required_if_any, required_if_present, validator};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn errors_json(group: &FormGroup, name: &str) -> Option<Value> {
        group.errors(name).cloned().map(ValidationErrors::into_value)
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut group = FormGroup::default();
        group.add_control("a", FormControl::plain("")).unwrap();
        assert_eq!(
            group.add_control("a", FormControl::plain("")),
            Err(FormError::DuplicateControl("a".to_string()))
        );
    }

    #[test]
    fn test_unknown_control() {
        let mut group = FormGroup::default();
        assert_eq!(
            group.set_value("missing", 1),
            Err(FormError::UnknownControl("missing".to_string()))
        );
        assert!(group.remove_control("missing").is_err());
        assert!(group.subscribe("missing", |_| {}).is_err());
    }

    #[test]
    fn test_builder_drains_rechecks_after_all_controls_attached() {
        let group = FormGroup::builder()
            .control("firstName", FormControl::new("", [required_if_any(["lastName"])]))
            .control("lastName", FormControl::plain("smith"))
            .build()
            .unwrap();

        assert_eq!(group.pending_rechecks(), 0);
        assert_eq!(
            errors_json(&group, "firstName"),
            Some(json!({"requiredIfAny": ["lastName"], "required": true}))
        );
    }

    #[test]
    fn test_manual_flush() {
        let mut group = FormGroup::builder()
            .config(FormConfig::manual_flush())
            .control("firstName", FormControl::new("", [required_if_any(["lastName"])]))
            .control("lastName", FormControl::plain("smith"))
            .build()
            .unwrap();

        assert_eq!(group.pending_rechecks(), 1);
        assert!(group.is_valid());

        assert_eq!(group.flush_pending(), 1);
        assert_eq!(group.pending_rechecks(), 0);
        assert!(!group.is_valid());
        assert_eq!(group.flush_pending(), 0);
    }

    #[test]
    fn test_sibling_change_revalidates_silently() {
        let mut group = FormGroup::builder()
            .control("email", FormControl::new("", [required_if_present("phone")]))
            .control("phone", FormControl::plain(""))
            .build()
            .unwrap();
        assert!(group.is_valid());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        group
            .subscribe("email", move |v| sink.borrow_mut().push(v.clone()))
            .unwrap();

        group.set_value("phone", "555-0100").unwrap();
        assert_eq!(
            errors_json(&group, "email"),
            Some(json!({"requiredIfPresent": "phone", "required": true}))
        );
        assert!(seen.borrow().is_empty());

        group.set_value("phone", "").unwrap();
        assert!(group.is_valid());
    }

    #[test]
    fn test_emit_event_cascades_once() {
        let config = FormConfig {
            revalidation: crate::config::RevalidationConfig { emit_event: true },
            ..FormConfig::default()
        };
        let mut group = FormGroup::builder()
            .config(config)
            .control("a", FormControl::new("", [required_if_present("b")]))
            .control("b", FormControl::new("", [required_if_present("a")]))
            .build()
            .unwrap();

        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        group.subscribe("b", move |_| *sink.borrow_mut() += 1).unwrap();

        group.set_value("a", "x").unwrap();
        assert_eq!(*seen.borrow(), 1);
        assert!(group.errors("b").is_some());
        assert!(group.errors("a").is_none());
    }

    #[test]
    fn test_repeated_validation_registers_once() {
        let passes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&passes);
        let counting = validator(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        });

        let mut group = FormGroup::builder()
            .control("a", FormControl::new("", [required_if_any(["b"]), counting]))
            .control("b", FormControl::plain(""))
            .build()
            .unwrap();

        for _ in 0..3 {
            group
                .update_value_and_validity("a", RevalidateOptions::silent())
                .unwrap();
        }
        assert_eq!(group.registry().len(), 1);

        // one pass over `a` per change of `b`
        let before = passes.load(Ordering::SeqCst);
        group.set_value("b", "x").unwrap();
        assert_eq!(passes.load(Ordering::SeqCst), before + 1);
        assert!(group.errors("a").is_some());
    }

    #[test]
    fn test_observing_a_sibling_added_later() {
        let mut group = FormGroup::default();
        group
            .add_control("a", FormControl::new("", [required_if_present("b")]))
            .unwrap();
        assert!(group.is_valid());
        assert_eq!(group.registry().dependencies_of(group.id_of("a").unwrap()), vec!["b"]);

        group.add_control("b", FormControl::plain("now here")).unwrap();
        assert!(group.errors("a").is_some());

        let removed = group.remove_control("b").unwrap();
        assert_eq!(removed.value(), &json!("now here"));
        assert!(group.is_valid());
    }

    #[test]
    fn test_remove_control_drops_its_dependencies() {
        let mut group = FormGroup::builder()
            .control("a", FormControl::new("", [required_if_present("b")]))
            .control("b", FormControl::plain(""))
            .build()
            .unwrap();
        assert_eq!(group.registry().len(), 1);

        group.remove_control("a").unwrap();
        assert!(group.registry().is_empty());
        assert_eq!(group.names().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut group = FormGroup::default();
        group.add_control("a", FormControl::plain("")).unwrap();

        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        let id = group.subscribe("a", move |_| *sink.borrow_mut() += 1).unwrap();

        group.set_value("a", "1").unwrap();
        assert!(group.unsubscribe(id));
        assert!(!group.unsubscribe(id));
        group.set_value("a", "2").unwrap();

        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn test_attached_recheck_request_waits_for_next_flush() {
        let always_recheck = validator(|ctx| {
            ctx.request_recheck();
            None
        });
        let mut group = FormGroup::default();
        group
            .add_control("a", FormControl::new("", [always_recheck]))
            .unwrap();

        // the detached request was drained; the attached pass queued another
        assert_eq!(group.pending_rechecks(), 1);
        assert_eq!(group.flush_pending(), 1);
        assert_eq!(group.pending_rechecks(), 1);
    }

    #[test]
    fn test_recheck_queued_once_per_control() {
        let always_recheck = validator(|ctx| {
            ctx.request_recheck();
            None
        });
        let mut group = FormGroup::default();
        group
            .add_control("a", FormControl::new("", [always_recheck]))
            .unwrap();
        assert_eq!(group.pending_rechecks(), 1);

        for value in ["x", "y", "z"] {
            group.set_value("a", value).unwrap();
        }
        assert_eq!(group.pending_rechecks(), 1);
    }

    #[test]
    fn test_sibling_reads_group_values() {
        let group = FormGroup::builder()
            .control("gender", FormControl::plain("other"))
            .control("age", FormControl::plain(30))
            .build()
            .unwrap();

        assert_eq!(group.sibling("gender"), Some(&json!("other")));
        assert_eq!(group.value("age"), Some(&json!(30)));
        assert_eq!(group.sibling("missing"), None);
    }

    #[test]
    fn test_value_and_errors_maps() {
        let group = FormGroup::builder()
            .control("name", FormControl::new("", [required()]))
            .control("age", FormControl::plain(30))
            .build()
            .unwrap();

        assert_eq!(Value::Object(group.value_map()), json!({"name": "", "age": 30}));
        let errors = group.errors_map();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["name"].clone().into_value(), json!({"required": true}));
    }
}
