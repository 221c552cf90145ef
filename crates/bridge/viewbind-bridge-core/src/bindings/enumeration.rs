use crate::bridge::{BindingOptions, EnumKind, MutationOutcome, PropertyBridge};

/// Enum property binding. Legal members are mirrored as extended data and
/// refreshed after every change or successful mutation.
#[derive(Debug)]
pub struct EnumBinding {
    bridge: PropertyBridge<EnumKind>,
}

impl EnumBinding {
    pub fn new(options: BindingOptions) -> Self {
        Self {
            bridge: PropertyBridge::new(options),
        }
    }

    /// Legal members; empty while unbound.
    pub fn values(&self) -> Vec<String> {
        self.bridge.extended().unwrap_or_default()
    }

    pub fn set_value(&self, value: impl Into<String>) -> MutationOutcome {
        let value = value.into();
        self.bridge.mutate(move |prop| prop.set_value(&value))
    }
}

deref_to_bridge!(EnumBinding, EnumKind);
