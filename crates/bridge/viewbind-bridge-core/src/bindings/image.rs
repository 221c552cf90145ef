use crate::bridge::{BindingOptions, ImageKind, MutationOutcome, PropertyBridge};
use crate::runtime::ImageRef;

/// Write-only image binding.
#[derive(Debug)]
pub struct ImageBinding {
    bridge: PropertyBridge<ImageKind>,
}

impl ImageBinding {
    pub fn new(options: BindingOptions) -> Self {
        Self {
            bridge: PropertyBridge::new(options),
        }
    }

    /// Assign `image`, or clear the slot with `None`.
    pub fn set_value(&self, image: Option<ImageRef>) -> MutationOutcome {
        self.bridge.mutate(move |prop| prop.set_value(image.as_ref()))
    }
}

deref_to_bridge!(ImageBinding, ImageKind);
