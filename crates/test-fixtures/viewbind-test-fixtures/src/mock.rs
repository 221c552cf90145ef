//! In-memory runtime implementing every `viewbind_bridge::runtime` trait.
//!
//! Properties count `on`/`off` calls and writes, can be marked stale (every
//! mutator then fails with [`RuntimeError::StaleHandle`]) or armed to fail
//! their next mutation. All writes land in a shared [`Journal`] so tests can
//! assert on ordering across properties.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hashbrown::HashMap;
use viewbind_api_core::{Color, PropertyKind, PropertyValue};
use viewbind_bridge::runtime::{
    same_object, BooleanProperty, ChangeCallback, ColorProperty, EnumProperty, EventCallback,
    EventSource, ImageProperty, ImageRef, InputRef, InputValue, InstanceRef, ListProperty,
    ListenerId, NativeProperty, NumberProperty, Runtime, RuntimeEvent, RuntimeEventKind,
    RuntimeFile, StateMachineInput, StringProperty, TriggerProperty, ViewModel, ViewModelInstance,
    ViewModelRef,
};
use viewbind_bridge::RuntimeError;

use crate::spec::{InputSpec, InstanceSpec, PropertySpec, ViewModelSpec};

#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub path: String,
    pub op: String,
}

#[derive(Debug, Default)]
struct JournalData {
    writes: Vec<JournalEntry>,
    listeners: Vec<JournalEntry>,
}

/// Ordered record of every accepted mutation and every listener
/// registration or removal.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<JournalData>>);

fn lines(entries: &[JournalEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| format!("{}: {}", e.path, e.op))
        .collect()
}

impl Journal {
    pub fn record(&self, path: &str, op: impl Into<String>) {
        self.0.borrow_mut().writes.push(JournalEntry {
            path: path.to_string(),
            op: op.into(),
        });
    }

    fn record_listener(&self, path: &str, op: &str) {
        self.0.borrow_mut().listeners.push(JournalEntry {
            path: path.to_string(),
            op: op.to_string(),
        });
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.0.borrow().writes.clone()
    }

    /// `"path: op"` strings, convenient for `assert_eq!`.
    pub fn lines(&self) -> Vec<String> {
        lines(&self.0.borrow().writes)
    }

    /// `"path: on"` / `"path: off"` in call order.
    pub fn listener_lines(&self) -> Vec<String> {
        lines(&self.0.borrow().listeners)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().writes.is_empty()
    }

    pub fn clear(&self) {
        let mut data = self.0.borrow_mut();
        data.writes.clear();
        data.listeners.clear();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyStats {
    pub on_calls: usize,
    pub off_calls: usize,
    pub active_listeners: usize,
    pub writes: usize,
}

#[derive(Default)]
struct Listeners {
    entries: RefCell<Vec<(ListenerId, ChangeCallback)>>,
    next: Cell<ListenerId>,
    on_calls: Cell<usize>,
    off_calls: Cell<usize>,
}

impl Listeners {
    fn add(&self, callback: ChangeCallback) -> ListenerId {
        let id = self.next.get();
        self.next.set(id + 1);
        self.on_calls.set(self.on_calls.get() + 1);
        self.entries.borrow_mut().push((id, callback));
        id
    }

    fn remove(&self, id: ListenerId) {
        self.off_calls.set(self.off_calls.get() + 1);
        self.entries.borrow_mut().retain(|(l, _)| *l != id);
    }

    fn emit(&self) {
        let callbacks: Vec<ChangeCallback> =
            self.entries.borrow().iter().map(|(_, c)| c.clone()).collect();
        for callback in callbacks {
            callback();
        }
    }
}

/// One property of any kind. The typed runtime traits are all implemented
/// on this type; [`MockInstance`] only hands it out under its own kind.
pub struct MockProperty {
    path: String,
    kind: PropertyKind,
    value: RefCell<PropertyValue>,
    enum_values: Vec<String>,
    items: RefCell<Vec<InstanceRef>>,
    image: RefCell<Option<ImageRef>>,
    listeners: Listeners,
    writes: Cell<usize>,
    stale: Cell<bool>,
    fail_next: RefCell<Option<RuntimeError>>,
    journal: Journal,
}

impl MockProperty {
    pub fn new(path: &str, value: PropertyValue, journal: Journal) -> Rc<Self> {
        Self::with_values(path, value, Vec::new(), journal)
    }

    pub fn with_values(
        path: &str,
        value: PropertyValue,
        enum_values: Vec<String>,
        journal: Journal,
    ) -> Rc<Self> {
        let items = match &value {
            PropertyValue::List(len) => (0..*len)
                .map(|i| MockInstance::empty(&format!("{path}[{i}]"), journal.clone()) as InstanceRef)
                .collect(),
            _ => Vec::new(),
        };
        Rc::new(Self {
            path: path.to_string(),
            kind: value.kind(),
            value: RefCell::new(value),
            enum_values,
            items: RefCell::new(items),
            image: RefCell::new(None),
            listeners: Listeners::default(),
            writes: Cell::new(0),
            stale: Cell::new(false),
            fail_next: RefCell::new(None),
            journal,
        })
    }

    fn from_spec(path: &str, spec: &PropertySpec, journal: Journal) -> Rc<Self> {
        Self::with_values(path, spec.value.clone(), spec.values.clone(), journal)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Current native value; lists report their length.
    pub fn current(&self) -> PropertyValue {
        match self.kind {
            PropertyKind::List => PropertyValue::List(self.items.borrow().len()),
            PropertyKind::Image => PropertyValue::Image(self.image.borrow().is_some()),
            _ => self.value.borrow().clone(),
        }
    }

    pub fn last_image(&self) -> Option<ImageRef> {
        self.image.borrow().clone()
    }

    pub fn items(&self) -> Vec<InstanceRef> {
        self.items.borrow().clone()
    }

    pub fn stats(&self) -> PropertyStats {
        PropertyStats {
            on_calls: self.listeners.on_calls.get(),
            off_calls: self.listeners.off_calls.get(),
            active_listeners: self.listeners.entries.borrow().len(),
            writes: self.writes.get(),
        }
    }

    pub fn set_stale(&self, stale: bool) {
        self.stale.set(stale);
    }

    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }

    /// The next mutation fails with `error`, once.
    pub fn fail_next(&self, error: RuntimeError) {
        *self.fail_next.borrow_mut() = Some(error);
    }

    /// Change the value from the runtime side (animation, state machine)
    /// and notify listeners. Not counted as a write.
    pub fn set_native(&self, value: PropertyValue) {
        *self.value.borrow_mut() = value;
        self.listeners.emit();
    }

    /// Fire change listeners without touching the value.
    pub fn emit(&self) {
        self.listeners.emit();
    }

    fn check(&self) -> Result<(), RuntimeError> {
        if let Some(error) = self.fail_next.borrow_mut().take() {
            return Err(error);
        }
        if self.stale.get() {
            return Err(RuntimeError::StaleHandle);
        }
        Ok(())
    }

    fn accepted(&self, op: String) {
        self.writes.set(self.writes.get() + 1);
        self.journal.record(&self.path, op);
    }

    /// Store `value`, notifying only when it changed.
    fn write(&self, value: PropertyValue, op: String) -> Result<(), RuntimeError> {
        self.check()?;
        self.accepted(op);
        let changed = *self.value.borrow() != value;
        if changed {
            *self.value.borrow_mut() = value;
            self.listeners.emit();
        }
        Ok(())
    }

    fn color(&self) -> Color {
        match &*self.value.borrow() {
            PropertyValue::Color(c) => *c,
            _ => Color::default(),
        }
    }

    fn text(&self) -> String {
        self.value.borrow().as_str().unwrap_or_default().to_string()
    }

    fn check_index(&self, index: usize) -> Result<(), RuntimeError> {
        let length = self.items.borrow().len();
        if index >= length {
            return Err(RuntimeError::IndexOutOfBounds { index, length });
        }
        Ok(())
    }
}

impl NativeProperty for MockProperty {
    fn on(&self, callback: ChangeCallback) -> ListenerId {
        self.journal.record_listener(&self.path, "on");
        self.listeners.add(callback)
    }

    fn off(&self, id: ListenerId) {
        self.journal.record_listener(&self.path, "off");
        self.listeners.remove(id);
    }
}

impl StringProperty for MockProperty {
    fn value(&self) -> String {
        self.text()
    }

    fn set_value(&self, value: &str) -> Result<(), RuntimeError> {
        self.write(PropertyValue::String(value.to_string()), format!("set {value}"))
    }
}

impl NumberProperty for MockProperty {
    fn value(&self) -> f32 {
        self.value.borrow().as_number().unwrap_or_default()
    }

    fn set_value(&self, value: f32) -> Result<(), RuntimeError> {
        self.write(PropertyValue::Number(value), format!("set {value}"))
    }
}

impl BooleanProperty for MockProperty {
    fn value(&self) -> bool {
        self.value.borrow().as_bool().unwrap_or_default()
    }

    fn set_value(&self, value: bool) -> Result<(), RuntimeError> {
        self.write(PropertyValue::Boolean(value), format!("set {value}"))
    }
}

impl ColorProperty for MockProperty {
    fn value(&self) -> Color {
        self.color()
    }

    fn set_value(&self, value: Color) -> Result<(), RuntimeError> {
        self.write(PropertyValue::Color(value), format!("set {value}"))
    }

    fn set_rgb(&self, r: u8, g: u8, b: u8) -> Result<(), RuntimeError> {
        let next = self.color().with_rgb(r, g, b);
        self.write(PropertyValue::Color(next), format!("rgb {r} {g} {b}"))
    }

    fn set_rgba(&self, r: u8, g: u8, b: u8, a: u8) -> Result<(), RuntimeError> {
        let next = Color::rgba(r, g, b, a);
        self.write(PropertyValue::Color(next), format!("rgba {r} {g} {b} {a}"))
    }

    fn set_alpha(&self, a: u8) -> Result<(), RuntimeError> {
        let next = self.color().with_alpha(a);
        self.write(PropertyValue::Color(next), format!("alpha {a}"))
    }

    fn set_opacity(&self, opacity: f32) -> Result<(), RuntimeError> {
        let next = self.color().with_opacity(opacity);
        self.write(PropertyValue::Color(next), format!("opacity {opacity}"))
    }
}

impl EnumProperty for MockProperty {
    fn value(&self) -> String {
        self.text()
    }

    fn values(&self) -> Vec<String> {
        self.enum_values.clone()
    }

    fn set_value(&self, value: &str) -> Result<(), RuntimeError> {
        // unknown members are ignored, like the engine does
        if !self.enum_values.iter().any(|v| v == value) {
            self.check()?;
            return Ok(());
        }
        self.write(PropertyValue::Enum(value.to_string()), format!("set {value}"))
    }
}

impl TriggerProperty for MockProperty {
    fn trigger(&self) -> Result<(), RuntimeError> {
        self.check()?;
        self.accepted("trigger".to_string());
        self.listeners.emit();
        Ok(())
    }
}

impl ImageProperty for MockProperty {
    fn set_value(&self, image: Option<&ImageRef>) -> Result<(), RuntimeError> {
        self.check()?;
        let op = if image.is_some() { "set image" } else { "clear image" };
        self.accepted(op.to_string());
        *self.image.borrow_mut() = image.cloned();
        self.listeners.emit();
        Ok(())
    }
}

impl ListProperty for MockProperty {
    fn length(&self) -> usize {
        self.items.borrow().len()
    }

    fn add_instance(&self, instance: &InstanceRef) -> Result<(), RuntimeError> {
        self.check()?;
        self.accepted(format!("add {}", instance.name()));
        self.items.borrow_mut().push(instance.clone());
        self.listeners.emit();
        Ok(())
    }

    fn add_instance_at(&self, instance: &InstanceRef, index: usize) -> Result<bool, RuntimeError> {
        self.check()?;
        if index > self.items.borrow().len() {
            return Ok(false);
        }
        self.accepted(format!("add {} at {index}", instance.name()));
        self.items.borrow_mut().insert(index, instance.clone());
        self.listeners.emit();
        Ok(true)
    }

    fn remove_instance(&self, instance: &InstanceRef) -> Result<(), RuntimeError> {
        self.check()?;
        let position = self
            .items
            .borrow()
            .iter()
            .position(|item| same_object(item, instance));
        if let Some(index) = position {
            self.accepted(format!("remove {}", instance.name()));
            self.items.borrow_mut().remove(index);
            self.listeners.emit();
        }
        Ok(())
    }

    fn remove_instance_at(&self, index: usize) -> Result<(), RuntimeError> {
        self.check()?;
        self.check_index(index)?;
        self.accepted(format!("remove at {index}"));
        self.items.borrow_mut().remove(index);
        self.listeners.emit();
        Ok(())
    }

    fn instance_at(&self, index: usize) -> Option<InstanceRef> {
        self.items.borrow().get(index).cloned()
    }

    fn swap(&self, a: usize, b: usize) -> Result<(), RuntimeError> {
        self.check()?;
        self.check_index(a)?;
        self.check_index(b)?;
        self.accepted(format!("swap {a} {b}"));
        self.items.borrow_mut().swap(a, b);
        self.listeners.emit();
        Ok(())
    }
}

/// View-model instance with a flat `path -> property` table.
pub struct MockInstance {
    name: String,
    properties: RefCell<HashMap<String, Rc<MockProperty>>>,
    journal: Journal,
}

impl MockInstance {
    pub fn empty(name: &str, journal: Journal) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            properties: RefCell::new(HashMap::new()),
            journal,
        })
    }

    pub fn from_spec(spec: &InstanceSpec, journal: Journal) -> Rc<Self> {
        let instance = Self::empty(&spec.name, journal);
        for (path, prop) in &spec.properties {
            let property = MockProperty::from_spec(path, prop, instance.journal.clone());
            instance.properties.borrow_mut().insert(path.clone(), property);
        }
        instance
    }

    /// Add or replace the property at `path`.
    pub fn insert(&self, path: &str, value: PropertyValue) -> Rc<MockProperty> {
        self.insert_enum(path, value, Vec::new())
    }

    pub fn insert_enum(&self, path: &str, value: PropertyValue, values: Vec<String>) -> Rc<MockProperty> {
        let property = MockProperty::with_values(path, value, values, self.journal.clone());
        self.properties
            .borrow_mut()
            .insert(path.to_string(), property.clone());
        property
    }

    pub fn remove(&self, path: &str) -> Option<Rc<MockProperty>> {
        self.properties.borrow_mut().remove(path)
    }

    pub fn property(&self, path: &str) -> Option<Rc<MockProperty>> {
        self.properties.borrow().get(path).cloned()
    }

    /// Replace the property at `path` with a fresh object holding the same
    /// value, as a hot reload does. The old handle turns stale.
    pub fn hot_reload(&self, path: &str) -> Option<Rc<MockProperty>> {
        let old = self.property(path)?;
        old.set_stale(true);
        let fresh = MockProperty::with_values(
            path,
            old.current(),
            old.enum_values.clone(),
            self.journal.clone(),
        );
        *fresh.items.borrow_mut() = old.items();
        self.properties
            .borrow_mut()
            .insert(path.to_string(), fresh.clone());
        Some(fresh)
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    fn typed(&self, path: &str, kind: PropertyKind) -> Option<Rc<MockProperty>> {
        self.property(path).filter(|p| p.kind == kind)
    }
}

impl ViewModelInstance for MockInstance {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn string(&self, path: &str) -> Option<Rc<dyn StringProperty>> {
        self.typed(path, PropertyKind::String)
            .map(|p| p as Rc<dyn StringProperty>)
    }

    fn number(&self, path: &str) -> Option<Rc<dyn NumberProperty>> {
        self.typed(path, PropertyKind::Number)
            .map(|p| p as Rc<dyn NumberProperty>)
    }

    fn boolean(&self, path: &str) -> Option<Rc<dyn BooleanProperty>> {
        self.typed(path, PropertyKind::Boolean)
            .map(|p| p as Rc<dyn BooleanProperty>)
    }

    fn color(&self, path: &str) -> Option<Rc<dyn ColorProperty>> {
        self.typed(path, PropertyKind::Color)
            .map(|p| p as Rc<dyn ColorProperty>)
    }

    fn enumeration(&self, path: &str) -> Option<Rc<dyn EnumProperty>> {
        self.typed(path, PropertyKind::Enum)
            .map(|p| p as Rc<dyn EnumProperty>)
    }

    fn trigger(&self, path: &str) -> Option<Rc<dyn TriggerProperty>> {
        self.typed(path, PropertyKind::Trigger)
            .map(|p| p as Rc<dyn TriggerProperty>)
    }

    fn image(&self, path: &str) -> Option<Rc<dyn ImageProperty>> {
        self.typed(path, PropertyKind::Image)
            .map(|p| p as Rc<dyn ImageProperty>)
    }

    fn list(&self, path: &str) -> Option<Rc<dyn ListProperty>> {
        self.typed(path, PropertyKind::List)
            .map(|p| p as Rc<dyn ListProperty>)
    }
}

pub struct MockViewModel {
    name: String,
    instances: Vec<Rc<MockInstance>>,
    default_instance: Option<String>,
    template: InstanceSpec,
    created: Cell<usize>,
    journal: Journal,
}

impl MockViewModel {
    pub fn from_spec(spec: &ViewModelSpec, journal: Journal) -> Rc<Self> {
        let instances: Vec<Rc<MockInstance>> = spec
            .instances
            .iter()
            .map(|i| MockInstance::from_spec(i, journal.clone()))
            .collect();
        let template = spec
            .template
            .clone()
            .or_else(|| {
                let default = spec.default_instance.as_deref();
                spec.instances
                    .iter()
                    .find(|i| Some(i.name.as_str()) == default)
                    .or_else(|| spec.instances.first())
                    .cloned()
            })
            .unwrap_or_default();
        Rc::new(Self {
            name: spec.name.clone(),
            instances,
            default_instance: spec.default_instance.clone(),
            template,
            created: Cell::new(0),
            journal,
        })
    }

    pub fn instance(&self, name: &str) -> Option<Rc<MockInstance>> {
        self.instances.iter().find(|i| i.name == name).cloned()
    }

    pub fn default_mock(&self) -> Option<Rc<MockInstance>> {
        match &self.default_instance {
            Some(name) => self.instance(name),
            None => self.instances.first().cloned(),
        }
    }

    /// Instances created through `new_instance`.
    pub fn created(&self) -> usize {
        self.created.get()
    }
}

impl ViewModel for MockViewModel {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn instance_by_name(&self, name: &str) -> Option<InstanceRef> {
        self.instance(name).map(|i| i as InstanceRef)
    }

    fn default_instance(&self) -> Option<InstanceRef> {
        self.default_mock().map(|i| i as InstanceRef)
    }

    fn new_instance(&self) -> Option<InstanceRef> {
        let n = self.created.get() + 1;
        self.created.set(n);
        let mut spec = self.template.clone();
        spec.name = format!("{}#{n}", self.name);
        Some(MockInstance::from_spec(&spec, self.journal.clone()) as InstanceRef)
    }
}

#[derive(Default)]
struct EventHub {
    listeners: RefCell<Vec<(ListenerId, RuntimeEventKind, EventCallback)>>,
    next: Cell<ListenerId>,
}

impl EventHub {
    fn on(&self, kind: RuntimeEventKind, callback: EventCallback) -> ListenerId {
        let id = self.next.get();
        self.next.set(id + 1);
        self.listeners.borrow_mut().push((id, kind, callback));
        id
    }

    fn off(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(l, _, _)| *l != id);
    }

    fn emit(&self, event: &RuntimeEvent) {
        let kind = event.kind();
        let callbacks: Vec<EventCallback> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, c)| c.clone())
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }

    fn active(&self) -> usize {
        self.listeners.borrow().len()
    }
}

pub struct MockInput {
    name: String,
    value: RefCell<InputValue>,
    fires: Cell<usize>,
}

impl MockInput {
    pub fn new(name: &str, value: InputValue) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            value: RefCell::new(value),
            fires: Cell::new(0),
        })
    }

    fn from_spec(spec: &InputSpec) -> Rc<Self> {
        match spec {
            InputSpec::Number { name, value } => Self::new(name, InputValue::Number(*value)),
            InputSpec::Boolean { name, value } => Self::new(name, InputValue::Boolean(*value)),
            InputSpec::Trigger { name } => Self::new(name, InputValue::Trigger),
        }
    }

    pub fn fires(&self) -> usize {
        self.fires.get()
    }

    pub fn current(&self) -> InputValue {
        self.value.borrow().clone()
    }
}

impl StateMachineInput for MockInput {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn value(&self) -> InputValue {
        self.current()
    }

    fn set_value(&self, value: InputValue) -> Result<(), RuntimeError> {
        *self.value.borrow_mut() = value;
        Ok(())
    }

    fn fire(&self) -> Result<(), RuntimeError> {
        self.fires.set(self.fires.get() + 1);
        Ok(())
    }
}

/// Runtime double. Loading is driven by the test through
/// [`MockRuntime::emit_load`] and [`MockRuntime::emit_load_error`].
#[derive(Default)]
pub struct MockRuntime {
    events: EventHub,
    view_models: RefCell<Vec<Rc<MockViewModel>>>,
    bound: RefCell<Option<InstanceRef>>,
    bind_calls: Cell<usize>,
    reject_bind: Cell<bool>,
    inputs: RefCell<HashMap<String, Vec<Rc<MockInput>>>>,
    cleanups: Cell<usize>,
    journal: Journal,
}

impl MockRuntime {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Runtime whose default view model is built from `spec`.
    pub fn from_spec(spec: &ViewModelSpec) -> Rc<Self> {
        let runtime = Self::new();
        let vm = MockViewModel::from_spec(spec, runtime.journal.clone());
        runtime.add_view_model(vm);
        for (state_machine, inputs) in &spec.state_machines {
            for input in inputs {
                runtime.add_input(state_machine, MockInput::from_spec(input));
            }
        }
        runtime
    }

    pub fn add_view_model(&self, view_model: Rc<MockViewModel>) {
        self.view_models.borrow_mut().push(view_model);
    }

    pub fn add_input(&self, state_machine: &str, input: Rc<MockInput>) {
        self.inputs
            .borrow_mut()
            .entry(state_machine.to_string())
            .or_default()
            .push(input);
    }

    pub fn view_model(&self, name: &str) -> Option<Rc<MockViewModel>> {
        self.view_models
            .borrow()
            .iter()
            .find(|vm| vm.name == name)
            .cloned()
    }

    /// Default instance of the default view model.
    pub fn default_mock_instance(&self) -> Option<Rc<MockInstance>> {
        self.view_models.borrow().first()?.default_mock()
    }

    pub fn input(&self, state_machine: &str, name: &str) -> Option<Rc<MockInput>> {
        self.inputs
            .borrow()
            .get(state_machine)?
            .iter()
            .find(|i| i.name == name)
            .cloned()
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn emit_load(&self) {
        self.events.emit(&RuntimeEvent::Load);
    }

    pub fn emit_load_error(&self, reason: &str) {
        self.events.emit(&RuntimeEvent::LoadError(reason.to_string()));
    }

    pub fn event_listeners(&self) -> usize {
        self.events.active()
    }

    pub fn bind_calls(&self) -> usize {
        self.bind_calls.get()
    }

    pub fn reject_bind(&self, reject: bool) {
        self.reject_bind.set(reject);
    }

    pub fn cleanups(&self) -> usize {
        self.cleanups.get()
    }
}

impl EventSource for MockRuntime {
    fn on_event(&self, kind: RuntimeEventKind, callback: EventCallback) -> ListenerId {
        self.events.on(kind, callback)
    }

    fn off_event(&self, id: ListenerId) {
        self.events.off(id);
    }
}

impl Runtime for MockRuntime {
    fn view_model_by_name(&self, name: &str) -> Option<ViewModelRef> {
        self.view_model(name).map(|vm| vm as ViewModelRef)
    }

    fn default_view_model(&self) -> Option<ViewModelRef> {
        self.view_models
            .borrow()
            .first()
            .cloned()
            .map(|vm| vm as ViewModelRef)
    }

    fn bound_instance(&self) -> Option<InstanceRef> {
        self.bound.borrow().clone()
    }

    fn bind_view_model_instance(&self, instance: &InstanceRef) -> Result<(), RuntimeError> {
        if self.reject_bind.get() {
            return Err(RuntimeError::Native("instance rejected".to_string()));
        }
        self.bind_calls.set(self.bind_calls.get() + 1);
        *self.bound.borrow_mut() = Some(instance.clone());
        Ok(())
    }

    fn state_machine_inputs(&self, state_machine: &str) -> Option<Vec<InputRef>> {
        let inputs = self.inputs.borrow();
        let list = inputs.get(state_machine)?;
        Some(list.iter().map(|i| i.clone() as InputRef).collect())
    }

    fn cleanup(&self) {
        self.cleanups.set(self.cleanups.get() + 1);
    }
}

#[derive(Default)]
pub struct MockFile {
    events: EventHub,
    init_calls: Cell<usize>,
    fail_init: Cell<bool>,
    acquired: Cell<usize>,
    cleanups: Cell<usize>,
}

impl MockFile {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn failing() -> Rc<Self> {
        let file = Self::new();
        file.fail_init.set(true);
        file
    }

    pub fn emit_load(&self) {
        self.events.emit(&RuntimeEvent::Load);
    }

    pub fn emit_load_error(&self, reason: &str) {
        self.events.emit(&RuntimeEvent::LoadError(reason.to_string()));
    }

    pub fn event_listeners(&self) -> usize {
        self.events.active()
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.get()
    }

    pub fn acquired(&self) -> usize {
        self.acquired.get()
    }

    pub fn cleanups(&self) -> usize {
        self.cleanups.get()
    }
}

impl EventSource for MockFile {
    fn on_event(&self, kind: RuntimeEventKind, callback: EventCallback) -> ListenerId {
        self.events.on(kind, callback)
    }

    fn off_event(&self, id: ListenerId) {
        self.events.off(id);
    }
}

impl RuntimeFile for MockFile {
    fn init(&self) -> Result<(), RuntimeError> {
        self.init_calls.set(self.init_calls.get() + 1);
        if self.fail_init.get() {
            return Err(RuntimeError::LoadFailed("corrupt file".to_string()));
        }
        Ok(())
    }

    fn acquire_instance(&self) {
        self.acquired.set(self.acquired.get() + 1);
    }

    fn cleanup(&self) {
        self.cleanups.set(self.cleanups.get() + 1);
    }
}
