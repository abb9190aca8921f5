//! Declarative config sets read from JSON
//!
//! ```json
//! {
//!   "field_config": [
//!     {"fields": ["first_name"], "can_view": true, "can_change": "users.can_change_profile"}
//!   ],
//!   "allow_view": ["id", "username"]
//! }
//! ```
//!
//! A rule is a boolean or the label of a registered permission. A missing
//! rule denies.

use super::{FieldPermissionConfig, FieldPermissionConfigSet, FieldRule};
use crate::error::{PermsError, Result};
use crate::registry::PermissionRegistry;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// One entry of `field_config`, kept loosely typed until resolved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfigDocument {
    pub fields: Value,
    #[serde(default)]
    pub can_view: Value,
    #[serde(default)]
    pub can_change: Value,
}

impl FieldConfigDocument {
    fn field_names(&self) -> Result<Vec<String>> {
        let Value::Array(items) = &self.fields else {
            return Err(PermsError::InvalidConfig(format!(
                "`fields` must be a list, got {}",
                self.fields
            )));
        };

        items
            .iter()
            .map(|item| match item {
                Value::String(name) => Ok(name.clone()),
                other => Err(PermsError::InvalidConfig(format!(
                    "field names must be strings, got {}",
                    other
                ))),
            })
            .collect()
    }

    /// Resolve the entry against `registry`
    pub fn resolve<U, O>(&self, registry: &PermissionRegistry<U, O>) -> Result<FieldPermissionConfig<U, O>> {
        let config = FieldPermissionConfig::new(self.field_names()?)?
            .with_view(resolve_rule("can_view", &self.can_view, registry)?)
            .with_change(resolve_rule("can_change", &self.can_change, registry)?);

        Ok(config)
    }
}

fn resolve_rule<U, O>(
    name: &str,
    rule: &Value,
    registry: &PermissionRegistry<U, O>,
) -> Result<FieldRule<U, O>> {
    match rule {
        Value::Null => Ok(FieldRule::default()),
        Value::Bool(allowed) => Ok(FieldRule::Static(*allowed)),
        Value::String(label) => Ok(FieldRule::Predicate(registry.get(label)?)),
        other => Err(PermsError::InvalidConfig(format!(
            "`{}` must be a bool or a permission label, got {}",
            name, other
        ))),
    }
}

/// A whole config set as written in a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSetDocument {
    #[serde(default)]
    pub field_config: Vec<FieldConfigDocument>,
    #[serde(default)]
    pub allow_view: Vec<String>,
    #[serde(default)]
    pub allow_change: Vec<String>,
}

impl ConfigSetDocument {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading field permissions from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Resolve every rule and build the config set
    pub fn resolve<U, O>(&self, registry: &PermissionRegistry<U, O>) -> Result<FieldPermissionConfigSet<U, O>> {
        let field_config = self
            .field_config
            .iter()
            .map(|entry| entry.resolve(registry))
            .collect::<Result<Vec<_>>>()?;

        FieldPermissionConfigSet::new(field_config, self.allow_view.clone(), self.allow_change.clone())
    }
}

impl<U, O> FieldPermissionConfigSet<U, O> {
    /// Build a config set from a JSON document, resolving labels in `registry`
    pub fn from_json_str(json: &str, registry: &PermissionRegistry<U, O>) -> Result<Self> {
        ConfigSetDocument::from_json_str(json)?.resolve(registry)
    }

    pub fn from_value(value: Value, registry: &PermissionRegistry<U, O>) -> Result<Self> {
        ConfigSetDocument::from_value(value)?.resolve(registry)
    }

    pub fn from_path(path: impl AsRef<Path>, registry: &PermissionRegistry<U, O>) -> Result<Self> {
        ConfigSetDocument::from_path(path)?.resolve(registry)
    }
}
