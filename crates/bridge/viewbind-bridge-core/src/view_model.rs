//! View-model and view-model-instance selection.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::runtime::{
    same_object, EventSubscription, InstanceRef, Runtime, RuntimeEvent, RuntimeEventKind,
    RuntimeRef, ViewModel, ViewModelRef,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewModelSelector {
    ByName(String),
    #[default]
    Default,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceSelector {
    ByName(String),
    #[default]
    Default,
    /// A blank instance created from the view model.
    New,
}

pub fn select_view_model(runtime: &dyn Runtime, selector: &ViewModelSelector) -> Option<ViewModelRef> {
    match selector {
        ViewModelSelector::ByName(name) => runtime.view_model_by_name(name),
        ViewModelSelector::Default => runtime.default_view_model(),
    }
}

pub fn select_instance(view_model: &dyn ViewModel, selector: &InstanceSelector) -> Option<InstanceRef> {
    match selector {
        InstanceSelector::ByName(name) => view_model.instance_by_name(name),
        InstanceSelector::Default => view_model.default_instance(),
        InstanceSelector::New => view_model.new_instance(),
    }
}

/// Bind `instance` into `runtime` unless it is already the bound one.
/// Returns whether the runtime now has `instance` bound; failures are logged.
pub fn bind_instance(runtime: &dyn Runtime, instance: &InstanceRef) -> bool {
    if runtime
        .bound_instance()
        .is_some_and(|current| same_object(&current, instance))
    {
        return true;
    }
    match runtime.bind_view_model_instance(instance) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("failed to bind view model instance '{}': {err}", instance.name());
            false
        }
    }
}

struct ViewModelInner {
    runtime: Option<RuntimeRef>,
    selector: ViewModelSelector,
    current: Option<ViewModelRef>,
    on_load: Option<EventSubscription>,
}

fn reselect(cell: &RefCell<ViewModelInner>) {
    let (runtime, selector) = {
        let inner = cell.borrow();
        (inner.runtime.clone(), inner.selector.clone())
    };
    let current = runtime.and_then(|rt| select_view_model(&*rt, &selector));
    cell.borrow_mut().current = current;
}

/// Keeps the selected view model current across runtime swaps and loads.
pub struct ViewModelBinding {
    inner: Rc<RefCell<ViewModelInner>>,
}

impl ViewModelBinding {
    pub fn new(selector: ViewModelSelector) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ViewModelInner {
                runtime: None,
                selector,
                current: None,
                on_load: None,
            })),
        }
    }

    /// Track `runtime`; selection reruns now and on each `Load` event.
    pub fn set_runtime(&self, runtime: Option<RuntimeRef>) {
        let previous = self.inner.borrow_mut().on_load.take();
        drop(previous);

        let subscription = runtime.as_ref().map(|rt| {
            let weak: Weak<RefCell<ViewModelInner>> = Rc::downgrade(&self.inner);
            EventSubscription::listen(
                rt,
                RuntimeEventKind::Load,
                Rc::new(move |_: &RuntimeEvent| {
                    if let Some(inner) = weak.upgrade() {
                        reselect(&inner);
                    }
                }),
            )
        });

        {
            let mut inner = self.inner.borrow_mut();
            inner.runtime = runtime;
            inner.on_load = subscription;
        }
        reselect(&self.inner);
    }

    pub fn set_selector(&self, selector: ViewModelSelector) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.selector == selector {
                return;
            }
            inner.selector = selector;
        }
        reselect(&self.inner);
    }

    pub fn current(&self) -> Option<ViewModelRef> {
        self.inner.borrow().current.clone()
    }

    pub fn dispose(&self) {
        let subscription = {
            let mut inner = self.inner.borrow_mut();
            inner.runtime = None;
            inner.current = None;
            inner.on_load.take()
        };
        drop(subscription);
    }
}

impl Drop for ViewModelBinding {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Selects an instance from a view model and optionally binds it into a
/// runtime.
pub struct InstanceBinding {
    selector: InstanceSelector,
    current: RefCell<Option<InstanceRef>>,
}

impl InstanceBinding {
    pub fn new(selector: InstanceSelector) -> Self {
        Self {
            selector,
            current: RefCell::new(None),
        }
    }

    /// Reselect from `view_model`; `None` clears the instance.
    pub fn set_view_model(&self, view_model: Option<&ViewModelRef>) -> Option<InstanceRef> {
        let selected = view_model.and_then(|vm| select_instance(&**vm, &self.selector));
        *self.current.borrow_mut() = selected.clone();
        selected
    }

    pub fn current(&self) -> Option<InstanceRef> {
        self.current.borrow().clone()
    }

    /// Bind the current instance into `runtime`. `false` when there is no
    /// instance or binding failed.
    pub fn bind_to(&self, runtime: &dyn Runtime) -> bool {
        match self.current() {
            Some(instance) => bind_instance(runtime, &instance),
            None => false,
        }
    }
}
