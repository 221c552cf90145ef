//! JSON shapes of the view-model fixtures under `fixtures/view-models/`.

use anyhow::{bail, Result};
use hashbrown::HashMap;
use serde::Deserialize;
use viewbind_api_core::PropertyValue;

#[derive(Debug, Clone, Deserialize)]
pub struct ViewModelSpec {
    pub name: String,
    /// Instance returned by `default_instance`; the first instance otherwise.
    #[serde(default)]
    pub default_instance: Option<String>,
    /// Instances in declaration order.
    pub instances: Vec<InstanceSpec>,
    /// Layout used by `new_instance`; the default instance's otherwise.
    #[serde(default)]
    pub template: Option<InstanceSpec>,
    #[serde(default)]
    pub state_machines: HashMap<String, Vec<InputSpec>>,
}

impl ViewModelSpec {
    /// Reject fixtures the mock runtime would silently misrepresent.
    pub fn validate(&self) -> Result<()> {
        if self.instances.is_empty() {
            bail!("view model '{}' declares no instances", self.name);
        }
        if let Some(default) = &self.default_instance {
            if !self.instances.iter().any(|i| &i.name == default) {
                bail!("default instance '{default}' is not declared");
            }
        }
        for instance in self.instances.iter().chain(self.template.as_ref()) {
            for (path, property) in &instance.properties {
                if let PropertyValue::Enum(member) = &property.value {
                    if !property.values.contains(member) {
                        bail!(
                            "'{}' of instance '{}' holds '{member}', not one of {:?}",
                            path,
                            instance.name,
                            property.values
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstanceSpec {
    pub name: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertySpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertySpec {
    pub value: PropertyValue,
    /// Legal members of an enum property.
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputSpec {
    Number { name: String, value: f32 },
    Boolean { name: String, value: bool },
    Trigger { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ViewModelSpec {
        serde_json::from_str(raw).expect("well-formed json")
    }

    #[test]
    fn missing_default_instance_is_rejected() {
        let spec = parse(r#"{ "name": "Card", "default_instance": "b", "instances": [{ "name": "a" }] }"#);
        let err = spec.validate().unwrap_err();
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn enum_value_outside_members_is_rejected() {
        let spec = parse(
            r#"{
                "name": "Card",
                "instances": [{
                    "name": "a",
                    "properties": {
                        "mode": { "value": { "type": "enum", "data": "gone" }, "values": ["on", "off"] }
                    }
                }]
            }"#,
        );
        assert!(spec.validate().is_err());
    }
}
