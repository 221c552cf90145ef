use crate::bridge::{BindingOptions, MutationOutcome, PropertyBridge, TriggerKind};

/// Trigger binding. Triggers have no value; `on_trigger` runs on every
/// native fire, including fires caused by [`TriggerBinding::trigger`].
#[derive(Debug)]
pub struct TriggerBinding {
    bridge: PropertyBridge<TriggerKind>,
}

impl TriggerBinding {
    pub fn new(options: BindingOptions) -> Self {
        Self {
            bridge: PropertyBridge::new(options),
        }
    }

    pub fn with_callback(options: BindingOptions, on_trigger: impl Fn() + 'static) -> Self {
        Self::new(options.on_event(on_trigger))
    }

    pub fn trigger(&self) -> MutationOutcome {
        self.bridge.mutate(|prop| prop.trigger())
    }

    /// Native fires observed since the last resolution.
    pub fn fire_count(&self) -> u64 {
        self.bridge.revision()
    }
}

deref_to_bridge!(TriggerBinding, TriggerKind);
