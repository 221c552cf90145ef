//! Top-level runtime controller.
//!
//! Tracks one runtime's load lifecycle and owns the readiness queue that
//! bindings defer their mutations into. The queue is flushed exactly once,
//! from the runtime's first `Load` event.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::bridge::BindingOptions;
use crate::config::{Config, RuntimeOptions};
use crate::diagnostics::Diagnostics;
use crate::error::RuntimeError;
use crate::queue::{FlushReport, ReadinessQueue, Submission};
use crate::runtime::{EventSubscription, RuntimeEvent, RuntimeEventKind, RuntimeRef};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

pub type ReadyHook = Rc<dyn Fn(&RuntimeRef)>;

struct ControllerInner {
    runtime: Option<RuntimeRef>,
    status: LoadStatus,
    listeners: Vec<EventSubscription>,
    on_ready: Option<ReadyHook>,
    last_flush: Option<FlushReport>,
    disposed: bool,
}

pub struct RuntimeController {
    inner: Rc<RefCell<ControllerInner>>,
    queue: ReadinessQueue,
    config: Config,
    options: RuntimeOptions,
    diagnostics: Diagnostics,
}

impl RuntimeController {
    pub fn new(config: Config, options: RuntimeOptions) -> Self {
        let diagnostics = Diagnostics::new(config.diagnostics.clone());
        Self {
            inner: Rc::new(RefCell::new(ControllerInner {
                runtime: None,
                status: LoadStatus::Idle,
                listeners: Vec::new(),
                on_ready: None,
                last_flush: None,
                disposed: false,
            })),
            queue: ReadinessQueue::with_capacity(config.pending_capacity),
            config,
            options,
            diagnostics,
        }
    }

    /// Route recovered mutation failures of bindings created through
    /// [`RuntimeController::binding_options`] to `diagnostics`.
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Run `hook` with the runtime once it has loaded, before queued
    /// operations are flushed.
    pub fn on_ready(&self, hook: impl Fn(&RuntimeRef) + 'static) {
        self.inner.borrow_mut().on_ready = Some(Rc::new(hook));
    }

    /// Start tracking `runtime`. A previously attached runtime is detached
    /// and cleaned up.
    pub fn attach(&self, runtime: RuntimeRef) {
        let previous = {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                log::debug!("attach ignored on disposed controller");
                return;
            }
            inner.status = LoadStatus::Loading;
            let listeners = std::mem::take(&mut inner.listeners);
            (inner.runtime.replace(runtime.clone()), listeners)
        };
        let (previous_runtime, previous_listeners) = previous;
        drop(previous_listeners);
        if let Some(old) = previous_runtime {
            old.cleanup();
        }

        let weak = Rc::downgrade(&self.inner);
        let queue = self.queue.clone();
        let on_load = EventSubscription::listen(
            &runtime,
            RuntimeEventKind::Load,
            Rc::new(move |_event: &RuntimeEvent| handle_load(&weak, &queue)),
        );

        let weak = Rc::downgrade(&self.inner);
        let on_error = EventSubscription::listen(
            &runtime,
            RuntimeEventKind::LoadError,
            Rc::new(move |event: &RuntimeEvent| {
                let reason = match event {
                    RuntimeEvent::LoadError(reason) => reason.clone(),
                    RuntimeEvent::Load => return,
                };
                log::error!("runtime load error: {reason}");
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().status = LoadStatus::Failed(reason);
                }
            }),
        );

        self.inner.borrow_mut().listeners = vec![on_load, on_error];
    }

    pub fn status(&self) -> LoadStatus {
        self.inner.borrow().status.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.status() == LoadStatus::Loaded
    }

    /// The runtime, once it has loaded.
    pub fn runtime(&self) -> Option<RuntimeRef> {
        let inner = self.inner.borrow();
        match inner.status {
            LoadStatus::Loaded => inner.runtime.clone(),
            _ => None,
        }
    }

    pub fn execute_when_ready<F>(&self, op: F) -> Submission
    where
        F: FnOnce() -> Result<(), RuntimeError> + 'static,
    {
        self.queue.execute_when_ready(op)
    }

    /// Queue handle to give to bindings.
    pub fn scheduler(&self) -> ReadinessQueue {
        self.queue.clone()
    }

    /// Options for bindings that should defer mutations until this
    /// controller's runtime has loaded.
    pub fn binding_options(&self) -> BindingOptions {
        BindingOptions::from_config(&self.config)
            .with_diagnostics(self.diagnostics.clone())
            .with_scheduler(self.queue.clone())
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Report of the flush triggered by the load event, if it happened.
    pub fn last_flush(&self) -> Option<FlushReport> {
        self.inner.borrow().last_flush
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// Remove listeners, clean the runtime up and discard pending operations.
    pub fn dispose(&self) {
        let (runtime, listeners) = {
            let mut inner = self.inner.borrow_mut();
            if inner.disposed {
                return;
            }
            inner.disposed = true;
            inner.status = LoadStatus::Idle;
            (inner.runtime.take(), std::mem::take(&mut inner.listeners))
        };
        drop(listeners);
        if let Some(runtime) = runtime {
            runtime.cleanup();
        }
        self.queue.dispose();
    }
}

fn handle_load(weak: &Weak<RefCell<ControllerInner>>, queue: &ReadinessQueue) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let (runtime, hook) = {
        let mut inner = inner.borrow_mut();
        if inner.disposed {
            return;
        }
        inner.status = LoadStatus::Loaded;
        (inner.runtime.clone(), inner.on_ready.clone())
    };
    if let (Some(runtime), Some(hook)) = (&runtime, hook) {
        hook(runtime);
    }
    let report = queue.flush();
    if report.executed + report.failed > 0 {
        log::debug!(
            "flushed {} pending operations ({} failed)",
            report.executed + report.failed,
            report.failed
        );
    }
    inner.borrow_mut().last_flush.get_or_insert(report);
}

impl Drop for RuntimeController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for RuntimeController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("RuntimeController")
            .field("status", &inner.status)
            .field("queue", &self.queue)
            .field("config", &self.config)
            .finish()
    }
}
