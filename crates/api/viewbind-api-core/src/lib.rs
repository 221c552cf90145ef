//! viewbind-api-core: property paths, kinds and values (core, runtime-agnostic)

pub mod color;
pub mod property_path;
pub mod value;

pub use color::Color;
pub use property_path::{PathError, PropertyPath, DEFAULT_DELIMITER};
pub use value::{PropertyKind, PropertyValue};
