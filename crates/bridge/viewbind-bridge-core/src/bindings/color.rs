use viewbind_api_core::Color;

use crate::bridge::{BindingOptions, ColorKind, MutationOutcome, PropertyBridge};

/// Color property binding. The mirrored value is packed ARGB.
#[derive(Debug)]
pub struct ColorBinding {
    bridge: PropertyBridge<ColorKind>,
}

impl ColorBinding {
    pub fn new(options: BindingOptions) -> Self {
        Self {
            bridge: PropertyBridge::new(options),
        }
    }

    pub fn set_value(&self, value: impl Into<Color>) -> MutationOutcome {
        let value = value.into();
        self.bridge.mutate(move |prop| prop.set_value(value))
    }

    pub fn set_rgb(&self, r: u8, g: u8, b: u8) -> MutationOutcome {
        self.bridge.mutate(move |prop| prop.set_rgb(r, g, b))
    }

    pub fn set_rgba(&self, r: u8, g: u8, b: u8, a: u8) -> MutationOutcome {
        self.bridge.mutate(move |prop| prop.set_rgba(r, g, b, a))
    }

    pub fn set_alpha(&self, a: u8) -> MutationOutcome {
        self.bridge.mutate(move |prop| prop.set_alpha(a))
    }

    /// `opacity` in 0..=1
    pub fn set_opacity(&self, opacity: f32) -> MutationOutcome {
        self.bridge.mutate(move |prop| prop.set_opacity(opacity))
    }
}

deref_to_bridge!(ColorBinding, ColorKind);
