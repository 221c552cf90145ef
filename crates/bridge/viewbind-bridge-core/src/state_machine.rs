//! State machine input lookup.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::{
    EventSubscription, InputRef, InputValue, Runtime, RuntimeEvent, RuntimeEventKind, RuntimeRef,
};

/// Find `input_name` on `state_machine`, applying `initial` if given.
pub fn find_input(
    runtime: &dyn Runtime,
    state_machine: &str,
    input_name: &str,
    initial: Option<&InputValue>,
) -> Option<InputRef> {
    if state_machine.is_empty() || input_name.is_empty() {
        return None;
    }
    let input = runtime
        .state_machine_inputs(state_machine)?
        .into_iter()
        .find(|input| input.name() == input_name)?;
    if let Some(value) = initial {
        if let Err(err) = input.set_value(value.clone()) {
            log::warn!("could not apply initial value to input '{input_name}': {err}");
        }
    }
    Some(input)
}

struct InputInner {
    runtime: Option<RuntimeRef>,
    state_machine: String,
    input_name: String,
    initial: Option<InputValue>,
    current: Option<InputRef>,
    on_load: Option<EventSubscription>,
}

fn lookup(cell: &RefCell<InputInner>) {
    let (runtime, state_machine, input_name, initial) = {
        let inner = cell.borrow();
        (
            inner.runtime.clone(),
            inner.state_machine.clone(),
            inner.input_name.clone(),
            inner.initial.clone(),
        )
    };
    let current = runtime
        .and_then(|rt| find_input(&*rt, &state_machine, &input_name, initial.as_ref()));
    cell.borrow_mut().current = current;
}

/// Tracks a named state machine input across runtime swaps and loads.
pub struct StateMachineInputBinding {
    inner: Rc<RefCell<InputInner>>,
}

impl StateMachineInputBinding {
    pub fn new(
        state_machine: impl Into<String>,
        input_name: impl Into<String>,
        initial: Option<InputValue>,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(InputInner {
                runtime: None,
                state_machine: state_machine.into(),
                input_name: input_name.into(),
                initial,
                current: None,
                on_load: None,
            })),
        }
    }

    pub fn set_runtime(&self, runtime: Option<RuntimeRef>) {
        let previous = self.inner.borrow_mut().on_load.take();
        drop(previous);

        let subscription = runtime.as_ref().map(|rt| {
            let weak = Rc::downgrade(&self.inner);
            EventSubscription::listen(
                rt,
                RuntimeEventKind::Load,
                Rc::new(move |_: &RuntimeEvent| {
                    if let Some(inner) = weak.upgrade() {
                        lookup(&inner);
                    }
                }),
            )
        });

        {
            let mut inner = self.inner.borrow_mut();
            inner.runtime = runtime;
            inner.on_load = subscription;
        }
        lookup(&self.inner);
    }

    pub fn input(&self) -> Option<InputRef> {
        self.inner.borrow().current.clone()
    }
}

impl Drop for StateMachineInputBinding {
    fn drop(&mut self) {
        let subscription = self.inner.borrow_mut().on_load.take();
        drop(subscription);
    }
}
