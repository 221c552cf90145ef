//! Per-kind capability descriptors.
//!
//! Each property kind is a zero-sized type implementing [`BindingKind`]. The
//! bridge is generic over it, so resolution, mirroring and mutation share one
//! implementation while handle, value and extended-data types stay static.

use std::fmt::Debug;
use std::rc::Rc;

use viewbind_api_core::{Color, PropertyKind, PropertyValue};

use crate::runtime::{
    BooleanProperty, ColorProperty, EnumProperty, ImageProperty, ListProperty, NativeProperty,
    NumberProperty, StringProperty, TriggerProperty, ViewModelInstance,
};

pub trait BindingKind: 'static {
    type Handle: ?Sized + NativeProperty;
    type Value: Clone + PartialEq + Debug + 'static;
    /// Auxiliary data mirrored next to the value (`()` when the kind has none).
    type Extended: Clone + PartialEq + Debug + 'static;

    const KIND: PropertyKind;

    /// Look the property up on `instance`. `None` is the unbound state.
    fn resolve(instance: &dyn ViewModelInstance, path: &str) -> Option<Rc<Self::Handle>>;

    /// Current value, `None` for kinds without a readable value.
    fn read(handle: &Self::Handle) -> Option<Self::Value>;

    fn read_extended(_handle: &Self::Handle) -> Option<Self::Extended> {
        None
    }

    fn snapshot(value: &Self::Value) -> PropertyValue;
}

#[derive(Debug)]
pub struct StringKind;

impl BindingKind for StringKind {
    type Handle = dyn StringProperty;
    type Value = String;
    type Extended = ();
    const KIND: PropertyKind = PropertyKind::String;

    fn resolve(instance: &dyn ViewModelInstance, path: &str) -> Option<Rc<Self::Handle>> {
        instance.string(path)
    }

    fn read(handle: &Self::Handle) -> Option<String> {
        Some(handle.value())
    }

    fn snapshot(value: &String) -> PropertyValue {
        PropertyValue::String(value.clone())
    }
}

#[derive(Debug)]
pub struct NumberKind;

impl BindingKind for NumberKind {
    type Handle = dyn NumberProperty;
    type Value = f32;
    type Extended = ();
    const KIND: PropertyKind = PropertyKind::Number;

    fn resolve(instance: &dyn ViewModelInstance, path: &str) -> Option<Rc<Self::Handle>> {
        instance.number(path)
    }

    fn read(handle: &Self::Handle) -> Option<f32> {
        Some(handle.value())
    }

    fn snapshot(value: &f32) -> PropertyValue {
        PropertyValue::Number(*value)
    }
}

#[derive(Debug)]
pub struct BooleanKind;

impl BindingKind for BooleanKind {
    type Handle = dyn BooleanProperty;
    type Value = bool;
    type Extended = ();
    const KIND: PropertyKind = PropertyKind::Boolean;

    fn resolve(instance: &dyn ViewModelInstance, path: &str) -> Option<Rc<Self::Handle>> {
        instance.boolean(path)
    }

    fn read(handle: &Self::Handle) -> Option<bool> {
        Some(handle.value())
    }

    fn snapshot(value: &bool) -> PropertyValue {
        PropertyValue::Boolean(*value)
    }
}

#[derive(Debug)]
pub struct ColorKind;

impl BindingKind for ColorKind {
    type Handle = dyn ColorProperty;
    type Value = Color;
    type Extended = ();
    const KIND: PropertyKind = PropertyKind::Color;

    fn resolve(instance: &dyn ViewModelInstance, path: &str) -> Option<Rc<Self::Handle>> {
        instance.color(path)
    }

    fn read(handle: &Self::Handle) -> Option<Color> {
        Some(handle.value())
    }

    fn snapshot(value: &Color) -> PropertyValue {
        PropertyValue::Color(*value)
    }
}

#[derive(Debug)]
pub struct EnumKind;

impl BindingKind for EnumKind {
    type Handle = dyn EnumProperty;
    type Value = String;
    /// Legal members
    type Extended = Vec<String>;
    const KIND: PropertyKind = PropertyKind::Enum;

    fn resolve(instance: &dyn ViewModelInstance, path: &str) -> Option<Rc<Self::Handle>> {
        instance.enumeration(path)
    }

    fn read(handle: &Self::Handle) -> Option<String> {
        Some(handle.value())
    }

    fn read_extended(handle: &Self::Handle) -> Option<Vec<String>> {
        Some(handle.values())
    }

    fn snapshot(value: &String) -> PropertyValue {
        PropertyValue::Enum(value.clone())
    }
}

#[derive(Debug)]
pub struct TriggerKind;

impl BindingKind for TriggerKind {
    type Handle = dyn TriggerProperty;
    type Value = ();
    type Extended = ();
    const KIND: PropertyKind = PropertyKind::Trigger;

    fn resolve(instance: &dyn ViewModelInstance, path: &str) -> Option<Rc<Self::Handle>> {
        instance.trigger(path)
    }

    fn read(_handle: &Self::Handle) -> Option<()> {
        None
    }

    fn snapshot(_value: &()) -> PropertyValue {
        PropertyValue::Trigger
    }
}

#[derive(Debug)]
pub struct ImageKind;

impl BindingKind for ImageKind {
    type Handle = dyn ImageProperty;
    type Value = ();
    type Extended = ();
    const KIND: PropertyKind = PropertyKind::Image;

    fn resolve(instance: &dyn ViewModelInstance, path: &str) -> Option<Rc<Self::Handle>> {
        instance.image(path)
    }

    fn read(_handle: &Self::Handle) -> Option<()> {
        None
    }

    fn snapshot(_value: &()) -> PropertyValue {
        PropertyValue::Image(true)
    }
}

/// Mirrors the list length; consumers re-query elements on change.
#[derive(Debug)]
pub struct ListKind;

impl BindingKind for ListKind {
    type Handle = dyn ListProperty;
    type Value = usize;
    type Extended = ();
    const KIND: PropertyKind = PropertyKind::List;

    fn resolve(instance: &dyn ViewModelInstance, path: &str) -> Option<Rc<Self::Handle>> {
        instance.list(path)
    }

    fn read(handle: &Self::Handle) -> Option<usize> {
        Some(handle.length())
    }

    fn snapshot(value: &usize) -> PropertyValue {
        PropertyValue::List(*value)
    }
}
