//! Generic property bridge.
//!
//! A [`PropertyBridge`] keeps a [`BridgeState`] snapshot in sync with one
//! property of a view-model instance:
//!
//! - resolution runs synchronously whenever the instance or path changes; the
//!   previous change subscription is removed before the new lookup starts
//! - native change notifications are copied into the snapshot, observers are
//!   told, then the kind's side-channel callback runs
//! - mutations go through [`PropertyBridge::mutate`], which queues them while
//!   no instance is bound and the runtime is not ready, retries once on a fresh handle when the cached
//!   one fails, and never returns an error to its caller
//!
//! Invariants:
//! 1. At most one native subscription is live per bridge.
//! 2. The snapshot value equals the native value while resolved and the
//!    configured default otherwise.
//! 3. Notifications from a superseded handle are ignored (generation check).

pub mod kind;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use viewbind_api_core::{PropertyPath, PropertyValue};

use crate::config::Config;
use crate::diagnostics::{Diagnostics, FailureStage, MutationFailure};
use crate::error::{BridgeError, RuntimeError};
use crate::queue::{ReadinessQueue, Submission};
use crate::runtime::{
    same_object, ChangeCallback, InstanceRef, ListenerId, NativeProperty, ViewModelInstance,
};

pub use kind::{
    BindingKind, BooleanKind, ColorKind, EnumKind, ImageKind, ListKind, NumberKind, StringKind,
    TriggerKind,
};

/// Observable snapshot of one bound property.
#[derive(Clone, Debug, PartialEq)]
pub struct BridgeState<V, E> {
    pub value: Option<V>,
    pub extended: Option<E>,
    /// A native handle is currently resolved.
    pub resolved: bool,
    /// Native change events seen over the bridge's lifetime. Never goes
    /// back, so a rebind cannot repeat an earlier count.
    pub revision: u64,
}

impl<V, E> BridgeState<V, E> {
    fn unresolved(default_value: Option<V>, revision: u64) -> Self {
        Self {
            value: default_value,
            extended: None,
            resolved: false,
            revision,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    /// Deferred until the runtime becomes ready.
    Queued,
    /// Nothing to apply to: no instance, no path, or no such property.
    Unresolved,
    /// Every attempt failed; the failure went to diagnostics.
    Rejected,
}

pub type ObserverId = u64;

pub type StateObserver<K> =
    Rc<dyn Fn(&BridgeState<<K as BindingKind>::Value, <K as BindingKind>::Extended>)>;

/// Construction options shared by every binding kind.
#[derive(Clone)]
pub struct BindingOptions {
    pub(crate) scheduler: Option<ReadinessQueue>,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) on_event: Option<Rc<dyn Fn()>>,
    pub(crate) delimiter: char,
}

impl BindingOptions {
    pub fn new() -> Self {
        Self {
            scheduler: None,
            diagnostics: Diagnostics::default(),
            on_event: None,
            delimiter: viewbind_api_core::DEFAULT_DELIMITER,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            diagnostics: Diagnostics::new(config.diagnostics.clone()),
            delimiter: config.path_delimiter,
            ..Self::new()
        }
    }

    /// Defer mutations into `queue` until it is ready.
    pub fn with_scheduler(mut self, queue: ReadinessQueue) -> Self {
        self.scheduler = Some(queue);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Side-channel callback run after every native change event, once the
    /// snapshot has been updated.
    pub fn on_event(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_event = Some(Rc::new(callback));
        self
    }

    pub fn scheduler(&self) -> Option<&ReadinessQueue> {
        self.scheduler.as_ref()
    }
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BindingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingOptions")
            .field("scheduler", &self.scheduler)
            .field("diagnostics", &self.diagnostics)
            .field("on_event", &self.on_event.is_some())
            .field("delimiter", &self.delimiter)
            .finish()
    }
}

struct Subscription<K: BindingKind> {
    handle: Rc<K::Handle>,
    id: ListenerId,
}

struct BridgeInner<K: BindingKind> {
    instance: Option<Weak<dyn ViewModelInstance>>,
    path: Option<PropertyPath>,
    handle: Option<Rc<K::Handle>>,
    subscription: Option<Subscription<K>>,
    generation: u64,
    state: BridgeState<K::Value, K::Extended>,
    default_value: Option<K::Value>,
    options: BindingOptions,
    observers: Vec<(ObserverId, StateObserver<K>)>,
    next_observer: ObserverId,
    disposed: bool,
}

impl<K: BindingKind> BridgeInner<K> {
    fn live_instance(&self) -> Option<InstanceRef> {
        self.instance.as_ref().and_then(Weak::upgrade)
    }

    fn target(&self) -> Option<(InstanceRef, String)> {
        Some((self.live_instance()?, self.path.as_ref()?.to_string()))
    }

    fn path_label(&self) -> String {
        self.path.as_ref().map(|p| p.to_string()).unwrap_or_default()
    }
}

type Cell<K> = Rc<RefCell<BridgeInner<K>>>;

/// Two-way binding between host state and one view-model property.
pub struct PropertyBridge<K: BindingKind> {
    inner: Cell<K>,
}

impl<K: BindingKind> PropertyBridge<K> {
    pub fn new(options: BindingOptions) -> Self {
        Self::with_default(options, None)
    }

    /// `default_value` is mirrored whenever no property is resolved.
    pub fn with_default(options: BindingOptions, default_value: Option<K::Value>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(BridgeInner {
                instance: None,
                path: None,
                handle: None,
                subscription: None,
                generation: 0,
                state: BridgeState::unresolved(default_value.clone(), 0),
                default_value,
                options,
                observers: Vec::new(),
                next_observer: 0,
                disposed: false,
            })),
        }
    }

    /// Point the bridge at `path` on `instance` and resolve once.
    pub fn bind(&self, instance: Option<&InstanceRef>, path: Option<&str>) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return;
            }
            let parsed = parse_path(path, inner.options.delimiter);
            inner.instance = instance.map(Rc::downgrade);
            inner.path = parsed;
        }
        resolve_now(&self.inner);
    }

    /// Like [`PropertyBridge::bind`], but a malformed path or a missing
    /// property is an error. A malformed path leaves the binding untouched; a
    /// missing property stays targeted, so a later `refresh` can pick it up.
    pub fn try_bind(&self, instance: &InstanceRef, path: &str) -> Result<(), BridgeError> {
        let delimiter = self.inner.borrow().options.delimiter;
        let parsed = PropertyPath::parse_with(path, delimiter)?;
        self.bind(Some(instance), Some(path));
        if self.is_resolved() {
            Ok(())
        } else {
            Err(BridgeError::PropertyNotFound {
                kind: K::KIND,
                path: parsed.to_string(),
            })
        }
    }

    /// Swap the bound instance. Re-resolves only when it actually changed.
    pub fn set_instance(&self, instance: Option<&InstanceRef>) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return;
            }
            let unchanged = match (&inner.instance, instance) {
                (None, None) => true,
                (Some(current), Some(next)) => {
                    std::ptr::eq(Weak::as_ptr(current) as *const (), Rc::as_ptr(next) as *const ())
                }
                _ => false,
            };
            if unchanged {
                return;
            }
            inner.instance = instance.map(Rc::downgrade);
        }
        resolve_now(&self.inner);
    }

    /// Change the property path. `None` or `""` unbinds.
    pub fn set_path(&self, path: Option<&str>) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return;
            }
            let parsed = parse_path(path, inner.options.delimiter);
            if parsed == inner.path {
                return;
            }
            inner.path = parsed;
        }
        resolve_now(&self.inner);
    }

    /// Resolve again against the current instance and path, e.g. after the
    /// runtime reloaded its object graph.
    pub fn refresh(&self) {
        if self.inner.borrow().disposed {
            return;
        }
        resolve_now(&self.inner);
    }

    pub fn instance(&self) -> Option<InstanceRef> {
        self.inner.borrow().live_instance()
    }

    pub fn path(&self) -> Option<PropertyPath> {
        self.inner.borrow().path.clone()
    }

    pub fn state(&self) -> BridgeState<K::Value, K::Extended> {
        self.inner.borrow().state.clone()
    }

    pub fn value(&self) -> Option<K::Value> {
        self.inner.borrow().state.value.clone()
    }

    pub fn extended(&self) -> Option<K::Extended> {
        self.inner.borrow().state.extended.clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.borrow().state.resolved
    }

    pub fn revision(&self) -> u64 {
        self.inner.borrow().state.revision
    }

    /// Kind-erased copy of the mirrored value.
    pub fn snapshot(&self) -> Option<PropertyValue> {
        self.inner.borrow().state.value.as_ref().map(K::snapshot)
    }

    pub fn has_subscription(&self) -> bool {
        self.inner.borrow().subscription.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().disposed
    }

    /// Register an observer called with the new snapshot after every change.
    pub fn subscribe(
        &self,
        observer: impl Fn(&BridgeState<K::Value, K::Extended>) + 'static,
    ) -> ObserverId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_observer;
        inner.next_observer += 1;
        inner.observers.push((id, Rc::new(observer)));
        id
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.observers.len();
        inner.observers.retain(|(oid, _)| *oid != id);
        inner.observers.len() != before
    }

    /// Apply `mutation` to the bound property.
    ///
    /// Order of attempts: queue when no instance is bound and the scheduler
    /// is not ready, cached handle, freshly resolved handle. Runtime errors are reported to
    /// diagnostics and never returned.
    pub fn mutate<F>(&self, mutation: F) -> MutationOutcome
    where
        F: FnMut(&K::Handle) -> Result<(), RuntimeError> + 'static,
    {
        let mut mutation = mutation;
        let scheduler = {
            let inner = self.inner.borrow();
            if inner.disposed {
                return MutationOutcome::Unresolved;
            }
            // a bound instance is written straight through
            match inner.live_instance() {
                Some(_) => None,
                None => inner.options.scheduler.clone(),
            }
        };

        if let Some(scheduler) = scheduler.filter(|s| !s.is_ready()) {
            let weak = Rc::downgrade(&self.inner);
            let submitted = scheduler.execute_when_ready(move || {
                // a dropped or disposed bridge turns this into a no-op
                if let Some(cell) = weak.upgrade() {
                    apply(&cell, &mut mutation);
                }
                Ok(())
            });
            return match submitted {
                Submission::Queued => MutationOutcome::Queued,
                Submission::Executed => MutationOutcome::Applied,
                Submission::Discarded => MutationOutcome::Unresolved,
            };
        }

        apply(&self.inner, &mut mutation)
    }

    /// Current instance and canonical path, if both are present.
    pub(crate) fn target(&self) -> Option<(InstanceRef, String)> {
        self.inner.borrow().target()
    }

    /// Forget instance and path, remove the native subscription and fall
    /// back to the default value. Idempotent.
    pub fn unbind(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.instance = None;
            inner.path = None;
        }
        resolve_now(&self.inner);
    }

    /// Hard teardown: unsubscribe, drop observers, ignore later calls.
    /// Mutations still queued for this bridge become no-ops.
    pub fn dispose(&self) {
        let previous = {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return;
            }
            inner.disposed = true;
            inner.generation += 1;
            inner.handle = None;
            inner.instance = None;
            inner.observers.clear();
            inner.subscription.take()
        };
        if let Some(sub) = previous {
            sub.handle.off(sub.id);
        }
    }
}

impl<K: BindingKind> Drop for PropertyBridge<K> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<K: BindingKind> fmt::Debug for PropertyBridge<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PropertyBridge")
            .field("kind", &K::KIND)
            .field("path", &inner.path)
            .field("state", &inner.state)
            .field("disposed", &inner.disposed)
            .finish()
    }
}

fn parse_path(path: Option<&str>, delimiter: char) -> Option<PropertyPath> {
    let raw = path.filter(|p| !p.is_empty())?;
    match PropertyPath::parse_with(raw, delimiter) {
        Ok(p) => Some(p),
        Err(err) => {
            log::debug!("treating malformed path as unbound: {err}");
            None
        }
    }
}

/// Remove the live subscription and start a new generation.
fn detach<K: BindingKind>(cell: &Cell<K>) -> u64 {
    let (previous, generation) = {
        let mut inner = cell.borrow_mut();
        inner.generation += 1;
        inner.handle = None;
        (inner.subscription.take(), inner.generation)
    };
    if let Some(sub) = previous {
        sub.handle.off(sub.id);
    }
    generation
}

fn resolve_now<K: BindingKind>(cell: &Cell<K>) {
    let generation = detach(cell);
    let (target, revision) = {
        let inner = cell.borrow();
        (inner.target(), inner.state.revision)
    };
    let handle = target
        .as_ref()
        .and_then(|(instance, path)| K::resolve(&**instance, path));

    match handle {
        Some(handle) => attach(cell, handle, generation, revision),
        None => {
            if let Some((_, path)) = &target {
                log::debug!("{} property '{}' not found", K::KIND, path);
            }
            let state = {
                let mut inner = cell.borrow_mut();
                if inner.generation != generation {
                    return;
                }
                let default_value = inner.default_value.clone();
                inner.state = BridgeState::unresolved(default_value, revision);
                inner.state.clone()
            };
            notify(cell, &state);
        }
    }
}

/// Move the subscription onto `fresh`, keeping the revision count.
fn rebind_to<K: BindingKind>(cell: &Cell<K>, fresh: Rc<K::Handle>) {
    let revision = cell.borrow().state.revision;
    let generation = detach(cell);
    attach(cell, fresh, generation, revision);
}

fn attach<K: BindingKind>(cell: &Cell<K>, handle: Rc<K::Handle>, generation: u64, revision: u64) {
    let value = K::read(&handle);
    let extended = K::read_extended(&handle);

    let weak = Rc::downgrade(cell);
    let callback: ChangeCallback = Rc::new(move || {
        if let Some(cell) = weak.upgrade() {
            on_native_change(&cell, generation);
        }
    });
    let id = handle.on(callback);

    let state = {
        let mut inner = cell.borrow_mut();
        if inner.generation != generation || inner.disposed {
            None
        } else {
            let value = value.or_else(|| inner.default_value.clone());
            inner.handle = Some(handle.clone());
            inner.state = BridgeState {
                value,
                extended,
                resolved: true,
                revision,
            };
            let state = inner.state.clone();
            inner.subscription = Some(Subscription {
                handle: handle.clone(),
                id,
            });
            Some(state)
        }
    };

    match state {
        Some(state) => {
            log::debug!("resolved {} property '{}'", K::KIND, cell.borrow().path_label());
            notify(cell, &state);
        }
        // superseded while subscribing
        None => handle.off(id),
    }
}

fn on_native_change<K: BindingKind>(cell: &Cell<K>, generation: u64) {
    let handle = {
        let inner = cell.borrow();
        if inner.generation != generation || inner.disposed {
            return;
        }
        match &inner.handle {
            Some(handle) => handle.clone(),
            None => return,
        }
    };

    let value = K::read(&handle);
    let extended = K::read_extended(&handle);

    let (state, on_event) = {
        let mut inner = cell.borrow_mut();
        if inner.generation != generation {
            return;
        }
        let value = value.or_else(|| inner.default_value.clone());
        inner.state.value = value;
        inner.state.extended = extended;
        inner.state.revision += 1;
        (inner.state.clone(), inner.options.on_event.clone())
    };

    notify(cell, &state);
    if let Some(on_event) = on_event {
        on_event();
    }
}

fn notify<K: BindingKind>(cell: &Cell<K>, state: &BridgeState<K::Value, K::Extended>) {
    let observers: Vec<StateObserver<K>> = cell
        .borrow()
        .observers
        .iter()
        .map(|(_, observer)| observer.clone())
        .collect();
    for observer in observers {
        observer(state);
    }
}

/// Re-read the snapshot after a successful mutation, for runtimes that
/// report changes lazily. Does not count as a native change event.
fn refresh_after_mutation<K: BindingKind>(cell: &Cell<K>, handle: &Rc<K::Handle>) {
    let value = K::read(handle);
    let extended = K::read_extended(handle);

    let changed = {
        let mut inner = cell.borrow_mut();
        let bound = inner
            .handle
            .as_ref()
            .is_some_and(|current| same_object(current, handle));
        let value = value.or_else(|| inner.default_value.clone());
        if !bound || (inner.state.value == value && inner.state.extended == extended) {
            None
        } else {
            inner.state.value = value;
            inner.state.extended = extended;
            Some(inner.state.clone())
        }
    };

    if let Some(state) = changed {
        notify(cell, &state);
    }
}

fn apply<K, F>(cell: &Cell<K>, mutation: &mut F) -> MutationOutcome
where
    K: BindingKind,
    F: FnMut(&K::Handle) -> Result<(), RuntimeError>,
{
    let (instance, path, cached, diagnostics) = {
        let inner = cell.borrow();
        if inner.disposed {
            return MutationOutcome::Unresolved;
        }
        (
            inner.live_instance(),
            inner.path.clone(),
            inner.handle.clone(),
            inner.options.diagnostics.clone(),
        )
    };
    let label = path.as_ref().map(|p| p.to_string()).unwrap_or_default();
    let mut rejected = false;

    if let (Some(handle), Some(_)) = (&cached, &instance) {
        match mutation(&**handle) {
            Ok(()) => {
                refresh_after_mutation(cell, handle);
                return MutationOutcome::Applied;
            }
            Err(error) => {
                diagnostics.report(&MutationFailure {
                    kind: K::KIND,
                    path: label.clone(),
                    stage: FailureStage::CachedHandle,
                    error,
                });
                rejected = true;
            }
        }
    }

    let unapplied = if rejected {
        MutationOutcome::Rejected
    } else {
        MutationOutcome::Unresolved
    };

    let (Some(instance), Some(path)) = (instance, path) else {
        log::debug!("{} mutation skipped: nothing bound", K::KIND);
        return unapplied;
    };
    let Some(fresh) = K::resolve(&*instance, &path.to_string()) else {
        log::debug!("{} mutation skipped: '{}' not found", K::KIND, label);
        return unapplied;
    };

    let reused = cached
        .as_ref()
        .is_some_and(|current| same_object(current, &fresh));
    if !reused {
        rebind_to(cell, fresh.clone());
    }

    match mutation(&*fresh) {
        Ok(()) => {
            refresh_after_mutation(cell, &fresh);
            MutationOutcome::Applied
        }
        Err(error) => {
            diagnostics.report(&MutationFailure {
                kind: K::KIND,
                path: label,
                stage: FailureStage::FreshHandle,
                error,
            });
            MutationOutcome::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    //! Minimal in-crate property doubles; the full mock runtime lives in
    //! `viewbind-test-fixtures` and is exercised by the integration tests.

    use super::*;
    use crate::runtime::{
        BooleanProperty, ColorProperty, EnumProperty, ImageProperty, ListProperty, NativeProperty,
        NumberProperty, StringProperty, TriggerProperty,
    };
    use std::cell::Cell as StdCell;

    #[derive(Default)]
    struct Num {
        value: StdCell<f32>,
        listeners: RefCell<Vec<(ListenerId, ChangeCallback)>>,
        next: StdCell<ListenerId>,
        offs: StdCell<usize>,
    }

    impl NativeProperty for Num {
        fn on(&self, callback: ChangeCallback) -> ListenerId {
            let id = self.next.get();
            self.next.set(id + 1);
            self.listeners.borrow_mut().push((id, callback));
            id
        }
        fn off(&self, id: ListenerId) {
            self.offs.set(self.offs.get() + 1);
            self.listeners.borrow_mut().retain(|(l, _)| *l != id);
        }
    }

    impl NumberProperty for Num {
        fn value(&self) -> f32 {
            self.value.get()
        }
        fn set_value(&self, value: f32) -> Result<(), RuntimeError> {
            self.value.set(value);
            let listeners: Vec<_> = self.listeners.borrow().iter().map(|(_, c)| c.clone()).collect();
            for l in listeners {
                l();
            }
            Ok(())
        }
    }

    struct OneNumber {
        prop: Rc<Num>,
    }

    impl ViewModelInstance for OneNumber {
        fn name(&self) -> String {
            "one".into()
        }
        fn string(&self, _: &str) -> Option<Rc<dyn StringProperty>> {
            None
        }
        fn number(&self, path: &str) -> Option<Rc<dyn NumberProperty>> {
            (path == "count").then(|| self.prop.clone() as Rc<dyn NumberProperty>)
        }
        fn boolean(&self, _: &str) -> Option<Rc<dyn BooleanProperty>> {
            None
        }
        fn color(&self, _: &str) -> Option<Rc<dyn ColorProperty>> {
            None
        }
        fn enumeration(&self, _: &str) -> Option<Rc<dyn EnumProperty>> {
            None
        }
        fn trigger(&self, _: &str) -> Option<Rc<dyn TriggerProperty>> {
            None
        }
        fn image(&self, _: &str) -> Option<Rc<dyn ImageProperty>> {
            None
        }
        fn list(&self, _: &str) -> Option<Rc<dyn ListProperty>> {
            None
        }
    }

    fn instance(value: f32) -> (Rc<Num>, InstanceRef) {
        let prop = Rc::new(Num::default());
        prop.value.set(value);
        let inst: InstanceRef = Rc::new(OneNumber { prop: prop.clone() });
        (prop, inst)
    }

    #[test]
    fn unbound_bridge_mirrors_default() {
        let bridge = PropertyBridge::<NumberKind>::with_default(BindingOptions::new(), Some(-1.0));
        assert_eq!(bridge.value(), Some(-1.0));
        assert!(!bridge.is_resolved());
        assert_eq!(bridge.mutate(|p| p.set_value(3.0)), MutationOutcome::Unresolved);
    }

    #[test]
    fn resolves_and_follows_native_changes() {
        let (prop, inst) = instance(2.0);
        let bridge = PropertyBridge::<NumberKind>::new(BindingOptions::new());
        bridge.bind(Some(&inst), Some("count"));
        assert_eq!(bridge.value(), Some(2.0));

        prop.set_value(5.0).unwrap();
        assert_eq!(bridge.value(), Some(5.0));
        assert_eq!(bridge.revision(), 1);
    }

    #[test]
    fn missing_property_is_unbound_not_error() {
        let (_prop, inst) = instance(2.0);
        let bridge = PropertyBridge::<NumberKind>::new(BindingOptions::new());
        bridge.bind(Some(&inst), Some("nope"));
        assert!(!bridge.is_resolved());
        assert_eq!(bridge.value(), None);
        assert!(!bridge.has_subscription());
    }

    #[test]
    fn dropped_instance_reads_as_unbound_on_refresh() {
        let (prop, inst) = instance(4.0);
        let bridge = PropertyBridge::<NumberKind>::new(BindingOptions::new());
        bridge.bind(Some(&inst), Some("count"));
        drop(inst);
        bridge.refresh();
        assert!(!bridge.is_resolved());
        assert_eq!(prop.offs.get(), 1);
        assert!(prop.listeners.borrow().is_empty());
    }

    #[test]
    fn observers_see_updates_until_unsubscribed() {
        let (prop, inst) = instance(0.0);
        let bridge = PropertyBridge::<NumberKind>::new(BindingOptions::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = bridge.subscribe(move |s| sink.borrow_mut().push(s.value));
        bridge.bind(Some(&inst), Some("count"));
        prop.set_value(1.5).unwrap();
        assert!(bridge.unsubscribe(id));
        prop.set_value(9.0).unwrap();
        assert_eq!(*seen.borrow(), vec![Some(0.0), Some(1.5)]);
    }

    #[test]
    fn try_bind_reports_missing_and_malformed() {
        let (_prop, inst) = instance(1.0);
        let bridge = PropertyBridge::<NumberKind>::new(BindingOptions::new());
        assert!(bridge.try_bind(&inst, "count").is_ok());
        assert!(matches!(
            bridge.try_bind(&inst, "nope"),
            Err(BridgeError::PropertyNotFound { .. })
        ));
        assert!(matches!(
            bridge.try_bind(&inst, "a//b"),
            Err(BridgeError::InvalidPath(_))
        ));
    }

    #[test]
    fn bound_instance_is_written_even_before_ready() {
        let (prop, inst) = instance(1.0);
        let queue = ReadinessQueue::new();
        let bridge =
            PropertyBridge::<NumberKind>::new(BindingOptions::new().with_scheduler(queue.clone()));
        bridge.bind(Some(&inst), Some("count"));
        assert_eq!(bridge.mutate(|p| p.set_value(7.0)), MutationOutcome::Applied);
        assert_eq!(prop.value.get(), 7.0);
        assert!(queue.is_empty());
    }

    #[test]
    fn write_without_instance_waits_for_ready_and_bound_instance() {
        let (prop, inst) = instance(1.0);
        let queue = ReadinessQueue::new();
        let bridge =
            PropertyBridge::<NumberKind>::new(BindingOptions::new().with_scheduler(queue.clone()));
        bridge.set_path(Some("count"));
        assert_eq!(bridge.mutate(|p| p.set_value(3.0)), MutationOutcome::Queued);
        bridge.set_instance(Some(&inst));
        assert_eq!(prop.value.get(), 1.0);
        queue.flush();
        assert_eq!(prop.value.get(), 3.0);
        assert!(queue.is_empty());
    }

    #[test]
    fn revision_keeps_counting_across_rebinds() {
        let (first, a) = instance(0.0);
        let (second, b) = instance(0.0);
        let bridge = PropertyBridge::<NumberKind>::new(BindingOptions::new());
        bridge.bind(Some(&a), Some("count"));
        first.set_value(1.0).unwrap();
        first.set_value(2.0).unwrap();
        assert_eq!(bridge.revision(), 2);

        bridge.set_instance(Some(&b));
        assert_eq!(bridge.revision(), 2);
        second.set_value(5.0).unwrap();
        assert_eq!(bridge.revision(), 3);

        bridge.unbind();
        assert_eq!(bridge.revision(), 3);
    }

    #[test]
    fn drop_removes_subscription() {
        let (prop, inst) = instance(0.0);
        {
            let bridge = PropertyBridge::<NumberKind>::new(BindingOptions::new());
            bridge.bind(Some(&inst), Some("count"));
            assert_eq!(prop.listeners.borrow().len(), 1);
        }
        assert!(prop.listeners.borrow().is_empty());
        assert_eq!(prop.offs.get(), 1);
    }
}
