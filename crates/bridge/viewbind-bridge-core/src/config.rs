//! Bridge configuration.

use serde::{Deserialize, Serialize};

use crate::diagnostics::DiagnosticsCfg;
use crate::error::BridgeError;

/// Configuration shared by a controller and the bindings it hands out.
/// Unknown or missing fields fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delimiter hosts use when writing property paths.
    pub path_delimiter: char,

    /// Initial capacity hint for the readiness queue.
    pub pending_capacity: usize,

    pub diagnostics: DiagnosticsCfg,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path_delimiter: viewbind_api_core::DEFAULT_DELIMITER,
            pending_capacity: 16,
            diagnostics: DiagnosticsCfg::default(),
        }
    }
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Options a host renderer forwards to the runtime it constructs.
/// The controller only stores them; mounting and sizing live elsewhere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeOptions {
    pub use_device_pixel_ratio: bool,
    /// 0 means "use the device value".
    pub custom_device_pixel_ratio: f32,
    pub fit_canvas_to_artboard_height: bool,
    pub use_offscreen_renderer: bool,
    pub should_resize_canvas_to_container: bool,
    pub should_use_intersection_observer: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            use_device_pixel_ratio: true,
            custom_device_pixel_ratio: 0.0,
            fit_canvas_to_artboard_height: false,
            use_offscreen_renderer: true,
            should_resize_canvas_to_container: true,
            should_use_intersection_observer: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json(r#"{ "path_delimiter": "." }"#).expect("parse config");
        assert_eq!(cfg.path_delimiter, '.');
        assert_eq!(cfg.pending_capacity, 16);
        assert!(cfg.diagnostics.enabled);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = Config::from_json("{ nope").unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn runtime_option_defaults() {
        let opts: RuntimeOptions =
            serde_json::from_str(r#"{ "use_offscreen_renderer": false }"#).unwrap();
        assert!(!opts.use_offscreen_renderer);
        assert!(opts.use_device_pixel_ratio);
        assert_eq!(opts.custom_device_pixel_ratio, 0.0);
    }
}
