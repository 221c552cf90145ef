//! Typed bindings, one per property kind.
//!
//! Each binding wraps a [`PropertyBridge`] (reachable through `Deref` for
//! `bind`, `set_path`, `subscribe`, ...) and adds the kind's mutators. Every
//! mutator goes through the bridge gateway, so it may apply immediately, be
//! queued while no instance is bound and the runtime is not ready, or do
//! nothing when unbound.

macro_rules! deref_to_bridge {
    ($binding:ty, $kind:ty) => {
        impl std::ops::Deref for $binding {
            type Target = $crate::bridge::PropertyBridge<$kind>;

            fn deref(&self) -> &Self::Target {
                &self.bridge
            }
        }
    };
}

mod color;
mod enumeration;
mod image;
mod list;
mod scalar;
mod trigger;

pub use color::ColorBinding;
pub use enumeration::EnumBinding;
pub use image::ImageBinding;
pub use list::ListBinding;
pub use scalar::{BooleanBinding, NumberBinding, StringBinding};
pub use trigger::TriggerBinding;
