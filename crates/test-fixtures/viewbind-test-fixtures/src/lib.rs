use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use hashbrown::HashMap;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub mod mock;
pub mod spec;

pub use mock::{
    Journal, JournalEntry, MockFile, MockInput, MockInstance, MockProperty, MockRuntime,
    MockViewModel, PropertyStats,
};
pub use spec::{InputSpec, InstanceSpec, PropertySpec, ViewModelSpec};

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(rename = "view-models")]
    view_models: HashMap<String, String>,
}

/// Fixture families listed in `fixtures/manifest.json`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FixtureKind {
    ViewModel,
}

impl FixtureKind {
    fn label(self) -> &'static str {
        match self {
            FixtureKind::ViewModel => "view model",
        }
    }

    fn entries(self) -> &'static HashMap<String, String> {
        match self {
            FixtureKind::ViewModel => &MANIFEST.view_models,
        }
    }

    fn names(self) -> Vec<String> {
        let mut names: Vec<String> = self.entries().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Absolute path of the named fixture; unknown names list what exists.
    fn locate(self, name: &str) -> Result<PathBuf> {
        let rel = self.entries().get(name).ok_or_else(|| {
            anyhow!(
                "unknown {} fixture '{name}' (known: {})",
                self.label(),
                self.names().join(", ")
            )
        })?;
        Ok(Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(rel))
    }

    fn read(self, name: &str) -> Result<String> {
        let path = self.locate(name)?;
        fs::read_to_string(&path).with_context(|| {
            format!(
                "failed to read {} fixture '{name}' at {}",
                self.label(),
                path.display()
            )
        })
    }

    fn parse<T: DeserializeOwned>(self, name: &str) -> Result<T> {
        let text = self.read(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("malformed {} fixture '{name}'", self.label()))
    }
}

pub mod view_models {
    use super::*;

    /// Fixture names, sorted.
    pub fn keys() -> Vec<String> {
        FixtureKind::ViewModel.names()
    }

    pub fn json(name: &str) -> Result<String> {
        FixtureKind::ViewModel.read(name)
    }

    /// Parsed and checked view model: the default instance must exist and
    /// enum values must be legal members.
    pub fn spec(name: &str) -> Result<ViewModelSpec> {
        let spec: ViewModelSpec = FixtureKind::ViewModel.parse(name)?;
        spec.validate()
            .with_context(|| format!("inconsistent view model fixture '{name}'"))?;
        Ok(spec)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        FixtureKind::ViewModel.locate(name)
    }

    /// Mock runtime whose default view model is the named fixture.
    pub fn runtime(name: &str) -> Result<Rc<MockRuntime>> {
        Ok(MockRuntime::from_spec(&spec(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewbind_api_core::{PropertyKind, PropertyValue};

    #[test]
    fn every_manifest_entry_parses() {
        for key in view_models::keys() {
            let spec = view_models::spec(&key).unwrap_or_else(|e| panic!("{key}: {e:#}"));
            assert!(!spec.instances.is_empty(), "{key} has no instances");
        }
    }

    #[test]
    fn unknown_fixture_names_the_known_ones() {
        let err = view_models::spec("does-not-exist").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("view model fixture 'does-not-exist'"));
        assert!(message.contains("player, profile, todo"));
    }

    #[test]
    fn fixture_paths_point_at_existing_files() {
        for key in view_models::keys() {
            let path = view_models::path(&key).expect("listed fixture");
            assert!(path.is_file(), "{} missing", path.display());
        }
    }

    #[test]
    fn profile_runtime_exposes_default_instance() {
        let runtime = view_models::runtime("profile").expect("profile fixture");
        let instance = runtime.default_mock_instance().expect("default instance");
        let name = instance.property("user/name").expect("user/name");
        assert_eq!(name.kind(), PropertyKind::String);
        assert!(matches!(name.current(), PropertyValue::String(_)));
    }
}
