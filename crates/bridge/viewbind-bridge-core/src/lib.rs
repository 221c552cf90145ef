//! viewbind-bridge
//!
//! Keeps host-side state in sync with view-model properties owned by an
//! external animation runtime. A binding resolves a property by path on a
//! view-model instance, mirrors its value (and native change events) into a
//! [`BridgeState`] snapshot, and routes writes through a mutation gateway that
//! defers writes issued before any instance is bound until the runtime has
//! loaded, and recovers from stale handles.
//!
//! Everything here is single-threaded: handles are `Rc` and callbacks run on
//! the thread that drives the runtime.

pub mod bindings;
pub mod bridge;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod error;
pub mod file;
pub mod queue;
pub mod runtime;
pub mod state_machine;
pub mod view_model;

pub use crate::bindings::{
    BooleanBinding, ColorBinding, EnumBinding, ImageBinding, ListBinding, NumberBinding,
    StringBinding, TriggerBinding,
};
pub use crate::bridge::{
    BindingKind, BindingOptions, BridgeState, MutationOutcome, ObserverId, PropertyBridge,
};
pub use crate::config::{Config, RuntimeOptions};
pub use crate::controller::{LoadStatus, RuntimeController};
pub use crate::diagnostics::{Diagnostics, DiagnosticsCfg, FailureStage, MutationFailure};
pub use crate::error::{BridgeError, RuntimeError};
pub use crate::file::{FileSource, FileStatus, FileTracker};
pub use crate::queue::{FlushReport, QueueState, ReadinessQueue, Submission};
pub use crate::runtime::{ImageRef, InputValue, InstanceRef, RuntimeEvent, RuntimeRef};
pub use crate::state_machine::{find_input, StateMachineInputBinding};
pub use crate::view_model::{
    select_instance, select_view_model, InstanceBinding, InstanceSelector, ViewModelBinding,
    ViewModelSelector,
};

pub use viewbind_api_core::{Color, PropertyKind, PropertyPath, PropertyValue};
