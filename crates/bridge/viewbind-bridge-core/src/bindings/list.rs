use std::cell::Cell;
use std::rc::Rc;

use crate::bridge::{BindingOptions, ListKind, MutationOutcome, PropertyBridge};
use crate::runtime::InstanceRef;

/// List property binding.
///
/// The mirrored value is the list length; [`ListBinding::revision`] counts
/// native change events so consumers know when to re-read elements.
#[derive(Debug)]
pub struct ListBinding {
    bridge: PropertyBridge<ListKind>,
}

impl ListBinding {
    pub fn new(options: BindingOptions) -> Self {
        Self {
            bridge: PropertyBridge::new(options),
        }
    }

    /// `on_change` runs after each native change, once the length is updated.
    pub fn with_callback(options: BindingOptions, on_change: impl Fn() + 'static) -> Self {
        Self::new(options.on_event(on_change))
    }

    pub fn length(&self) -> Option<usize> {
        self.bridge.value()
    }

    pub fn add_instance(&self, instance: &InstanceRef) -> MutationOutcome {
        let instance = instance.clone();
        self.bridge.mutate(move |list| list.add_instance(&instance))
    }

    /// `true` only when the insertion ran now and the runtime accepted it.
    /// Queued insertions report `false`.
    pub fn add_instance_at(&self, instance: &InstanceRef, index: usize) -> bool {
        let instance = instance.clone();
        let inserted = Rc::new(Cell::new(false));
        let sink = inserted.clone();
        let outcome = self.bridge.mutate(move |list| {
            sink.set(list.add_instance_at(&instance, index)?);
            Ok(())
        });
        outcome == MutationOutcome::Applied && inserted.get()
    }

    pub fn remove_instance(&self, instance: &InstanceRef) -> MutationOutcome {
        let instance = instance.clone();
        self.bridge.mutate(move |list| list.remove_instance(&instance))
    }

    pub fn remove_instance_at(&self, index: usize) -> MutationOutcome {
        self.bridge.mutate(move |list| list.remove_instance_at(index))
    }

    pub fn swap(&self, a: usize, b: usize) -> MutationOutcome {
        self.bridge.mutate(move |list| list.swap(a, b))
    }

    /// Element at `index`, looked up directly on the current instance.
    /// Any failure reads as `None`.
    pub fn instance_at(&self, index: usize) -> Option<InstanceRef> {
        let (instance, path) = self.bridge.target()?;
        instance.list(&path)?.instance_at(index)
    }
}

deref_to_bridge!(ListBinding, ListKind);
