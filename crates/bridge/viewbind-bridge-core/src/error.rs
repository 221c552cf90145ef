//! Error types for the binding bridge

use viewbind_api_core::{PathError, PropertyKind};

/// Failure reported by the external runtime.
///
/// Every fallible runtime call returns this instead of unwinding; an `Err`
/// plays the role of a native exception thrown by the engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum RuntimeError {
    /// The handle points at an object the runtime has since replaced
    #[error("stale property handle")]
    StaleHandle,

    /// The owning instance or runtime was cleaned up
    #[error("object detached from runtime")]
    Detached,

    /// Index outside the bounds of a list property
    #[error("index {index} out of bounds for list of length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// Asset or file failed to load
    #[error("load failed: {0}")]
    LoadFailed(String),

    /// Any other engine-side failure
    #[error("runtime error: {0}")]
    Native(String),
}

/// Errors surfaced by constructors and configuration helpers.
///
/// Binding operations never return these; an unbound or stale property is a
/// state, not an error.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum BridgeError {
    #[error("invalid property path: {0}")]
    InvalidPath(#[from] PathError),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("{kind} property not found at '{path}'")]
    PropertyNotFound { kind: PropertyKind, path: String },
}
