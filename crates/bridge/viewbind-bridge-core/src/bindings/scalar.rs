use crate::bridge::{
    BindingOptions, BooleanKind, MutationOutcome, NumberKind, PropertyBridge, StringKind,
};

#[derive(Debug)]
pub struct StringBinding {
    bridge: PropertyBridge<StringKind>,
}

impl StringBinding {
    pub fn new(options: BindingOptions) -> Self {
        Self {
            bridge: PropertyBridge::new(options),
        }
    }

    pub fn with_default(options: BindingOptions, default_value: impl Into<String>) -> Self {
        Self {
            bridge: PropertyBridge::with_default(options, Some(default_value.into())),
        }
    }

    pub fn set_value(&self, value: impl Into<String>) -> MutationOutcome {
        let value = value.into();
        self.bridge.mutate(move |prop| prop.set_value(&value))
    }
}

deref_to_bridge!(StringBinding, StringKind);

#[derive(Debug)]
pub struct NumberBinding {
    bridge: PropertyBridge<NumberKind>,
}

impl NumberBinding {
    pub fn new(options: BindingOptions) -> Self {
        Self {
            bridge: PropertyBridge::new(options),
        }
    }

    pub fn with_default(options: BindingOptions, default_value: f32) -> Self {
        Self {
            bridge: PropertyBridge::with_default(options, Some(default_value)),
        }
    }

    pub fn set_value(&self, value: f32) -> MutationOutcome {
        self.bridge.mutate(move |prop| prop.set_value(value))
    }
}

deref_to_bridge!(NumberBinding, NumberKind);

#[derive(Debug)]
pub struct BooleanBinding {
    bridge: PropertyBridge<BooleanKind>,
}

impl BooleanBinding {
    pub fn new(options: BindingOptions) -> Self {
        Self {
            bridge: PropertyBridge::new(options),
        }
    }

    pub fn with_default(options: BindingOptions, default_value: bool) -> Self {
        Self {
            bridge: PropertyBridge::with_default(options, Some(default_value)),
        }
    }

    pub fn set_value(&self, value: bool) -> MutationOutcome {
        self.bridge.mutate(move |prop| prop.set_value(value))
    }

    /// Flip the mirrored value. Unbound bindings stay untouched.
    pub fn toggle(&self) -> MutationOutcome {
        match self.bridge.value() {
            Some(current) => self.set_value(!current),
            None => MutationOutcome::Unresolved,
        }
    }
}

deref_to_bridge!(BooleanBinding, BooleanKind);
