//! Capability interfaces consumed from the external animation runtime.
//!
//! The runtime owns every object reachable through these traits. The bridge
//! holds them as opaque references and never observes their internals; only
//! the snapshots it mirrors into [`crate::BridgeState`] are observable.
//!
//! All handles are single-threaded (`Rc`), matching the runtime's event loop.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use viewbind_api_core::Color;

use crate::error::RuntimeError;

/// Token returned by `on`, passed back to `off`.
pub type ListenerId = u64;

/// Native change notification callback.
pub type ChangeCallback = Rc<dyn Fn()>;

/// Change subscription shared by every property kind.
pub trait NativeProperty {
    fn on(&self, callback: ChangeCallback) -> ListenerId;
    /// Unknown or already removed ids are ignored.
    fn off(&self, id: ListenerId);
}

pub trait StringProperty: NativeProperty {
    fn value(&self) -> String;
    fn set_value(&self, value: &str) -> Result<(), RuntimeError>;
}

pub trait NumberProperty: NativeProperty {
    fn value(&self) -> f32;
    fn set_value(&self, value: f32) -> Result<(), RuntimeError>;
}

pub trait BooleanProperty: NativeProperty {
    fn value(&self) -> bool;
    fn set_value(&self, value: bool) -> Result<(), RuntimeError>;
}

pub trait ColorProperty: NativeProperty {
    fn value(&self) -> Color;
    fn set_value(&self, value: Color) -> Result<(), RuntimeError>;
    fn set_rgb(&self, r: u8, g: u8, b: u8) -> Result<(), RuntimeError>;
    fn set_rgba(&self, r: u8, g: u8, b: u8, a: u8) -> Result<(), RuntimeError>;
    fn set_alpha(&self, a: u8) -> Result<(), RuntimeError>;
    fn set_opacity(&self, opacity: f32) -> Result<(), RuntimeError>;
}

pub trait EnumProperty: NativeProperty {
    fn value(&self) -> String;
    /// Legal members, in declaration order.
    fn values(&self) -> Vec<String>;
    fn set_value(&self, value: &str) -> Result<(), RuntimeError>;
}

pub trait TriggerProperty: NativeProperty {
    fn trigger(&self) -> Result<(), RuntimeError>;
}

/// Write-only image slot.
pub trait ImageProperty: NativeProperty {
    fn set_value(&self, image: Option<&ImageRef>) -> Result<(), RuntimeError>;
}

pub trait ListProperty: NativeProperty {
    fn length(&self) -> usize;
    fn add_instance(&self, instance: &InstanceRef) -> Result<(), RuntimeError>;
    /// `Ok(false)` when the runtime refused the insertion.
    fn add_instance_at(&self, instance: &InstanceRef, index: usize) -> Result<bool, RuntimeError>;
    fn remove_instance(&self, instance: &InstanceRef) -> Result<(), RuntimeError>;
    fn remove_instance_at(&self, index: usize) -> Result<(), RuntimeError>;
    fn instance_at(&self, index: usize) -> Option<InstanceRef>;
    fn swap(&self, a: usize, b: usize) -> Result<(), RuntimeError>;
}

/// A node of the runtime's view-model object graph.
///
/// Every accessor takes a canonical '/'-delimited path and returns `None` when
/// no property of that kind lives there.
pub trait ViewModelInstance {
    fn name(&self) -> String;
    fn string(&self, path: &str) -> Option<Rc<dyn StringProperty>>;
    fn number(&self, path: &str) -> Option<Rc<dyn NumberProperty>>;
    fn boolean(&self, path: &str) -> Option<Rc<dyn BooleanProperty>>;
    fn color(&self, path: &str) -> Option<Rc<dyn ColorProperty>>;
    fn enumeration(&self, path: &str) -> Option<Rc<dyn EnumProperty>>;
    fn trigger(&self, path: &str) -> Option<Rc<dyn TriggerProperty>>;
    fn image(&self, path: &str) -> Option<Rc<dyn ImageProperty>>;
    fn list(&self, path: &str) -> Option<Rc<dyn ListProperty>>;
}

pub type InstanceRef = Rc<dyn ViewModelInstance>;

pub trait ViewModel {
    fn name(&self) -> String;
    fn instance_by_name(&self, name: &str) -> Option<InstanceRef>;
    fn default_instance(&self) -> Option<InstanceRef>;
    fn new_instance(&self) -> Option<InstanceRef>;
}

pub type ViewModelRef = Rc<dyn ViewModel>;

/// Lifecycle events emitted by runtimes and runtime files.
#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeEvent {
    Load,
    LoadError(String),
}

impl RuntimeEvent {
    pub fn kind(&self) -> RuntimeEventKind {
        match self {
            RuntimeEvent::Load => RuntimeEventKind::Load,
            RuntimeEvent::LoadError(_) => RuntimeEventKind::LoadError,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RuntimeEventKind {
    Load,
    LoadError,
}

pub type EventCallback = Rc<dyn Fn(&RuntimeEvent)>;

pub trait EventSource {
    fn on_event(&self, kind: RuntimeEventKind, callback: EventCallback) -> ListenerId;
    fn off_event(&self, id: ListenerId);
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputValue {
    Number(f32),
    Boolean(bool),
    Trigger,
}

pub trait StateMachineInput {
    fn name(&self) -> String;
    fn value(&self) -> InputValue;
    fn set_value(&self, value: InputValue) -> Result<(), RuntimeError>;
    fn fire(&self) -> Result<(), RuntimeError>;
}

pub type InputRef = Rc<dyn StateMachineInput>;

/// Top-level runtime object (an artboard player in most engines).
pub trait Runtime: EventSource {
    fn view_model_by_name(&self, name: &str) -> Option<ViewModelRef>;
    fn default_view_model(&self) -> Option<ViewModelRef>;
    fn bound_instance(&self) -> Option<InstanceRef>;
    fn bind_view_model_instance(&self, instance: &InstanceRef) -> Result<(), RuntimeError>;
    fn state_machine_inputs(&self, state_machine: &str) -> Option<Vec<InputRef>>;
    fn cleanup(&self);
}

pub type RuntimeRef = Rc<dyn Runtime>;

/// A loaded asset file shared between runtimes.
pub trait RuntimeFile: EventSource {
    fn init(&self) -> Result<(), RuntimeError>;
    /// Take a reference so the runtime keeps the file alive.
    fn acquire_instance(&self);
    fn cleanup(&self);
}

pub type FileRef = Rc<dyn RuntimeFile>;

/// Opaque decoded image handed to [`ImageProperty::set_value`].
#[derive(Clone)]
pub struct ImageRef(Rc<dyn Any>);

impl ImageRef {
    pub fn new<T: Any>(image: T) -> Self {
        ImageRef(Rc::new(image))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &ImageRef) -> bool {
        same_object(&self.0, &other.0)
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageRef({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Address identity for possibly unsized `Rc`s (vtable pointers are ignored).
pub fn same_object<T: ?Sized, U: ?Sized>(a: &Rc<T>, b: &Rc<U>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

/// Live subscription to a lifecycle event; removed on `cancel` or drop.
pub struct EventSubscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl EventSubscription {
    pub fn listen<S>(source: &Rc<S>, kind: RuntimeEventKind, callback: EventCallback) -> Self
    where
        S: EventSource + ?Sized + 'static,
    {
        let id = source.on_event(kind, callback);
        let source = source.clone();
        Self {
            cancel: Some(Box::new(move || source.off_event(id))),
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSubscription")
            .field("active", &self.is_active())
            .finish()
    }
}
