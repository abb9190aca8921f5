//! Field permission config sets

use super::{FieldAction, FieldPermissionConfig};
use crate::error::{PermsError, Result};
use crate::predicate::RequestContext;
use crate::types::Identity;

use std::fmt;
use tracing::debug;

/// Field permissions for one kind of object
///
/// Statically allowed fields take priority over dynamic configs. A field may
/// not be declared both ways.
pub struct FieldPermissionConfigSet<U, O> {
    field_config: Vec<FieldPermissionConfig<U, O>>,
    allow_view: Vec<String>,
    allow_change: Vec<String>,
}

impl<U, O> FieldPermissionConfigSet<U, O> {
    /// Create a config set
    ///
    /// Fails when nothing is declared, or when a field has both a static and
    /// a dynamic permission.
    pub fn new(
        field_config: Vec<FieldPermissionConfig<U, O>>,
        allow_view: Vec<String>,
        allow_change: Vec<String>,
    ) -> Result<Self> {
        if field_config.is_empty() && allow_view.is_empty() && allow_change.is_empty() {
            return Err(PermsError::InvalidConfig(
                "expected at least one field config or one static config".to_string(),
            ));
        }

        for config in &field_config {
            for field in config.fields() {
                if allow_view.contains(field) || allow_change.contains(field) {
                    return Err(PermsError::InvalidConfig(format!(
                        "the field {} was specified with a dynamic and static permission; \
                         remove it from the static lists or fold the static permission \
                         into the dynamic config",
                        field
                    )));
                }
            }
        }

        Ok(Self {
            field_config,
            allow_view,
            allow_change,
        })
    }

    pub fn builder() -> FieldPermissionConfigSetBuilder<U, O> {
        FieldPermissionConfigSetBuilder::default()
    }

    /// Parse an action name, rejecting anything but `view` and `change`
    pub fn validate_action(action: &str) -> Result<FieldAction> {
        action.parse()
    }

    /// Fields statically allowed for `action`, in declared order
    pub fn static_fields(&self, action: FieldAction) -> &[String] {
        match action {
            FieldAction::View => &self.allow_view,
            FieldAction::Change => &self.allow_change,
        }
    }

    pub fn field_configs(&self) -> &[FieldPermissionConfig<U, O>] {
        &self.field_config
    }

    /// Every field name the set declares, static or dynamic
    pub fn declared_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let dynamic = self.field_config.iter().flat_map(|config| config.fields());

        for field in self.allow_view.iter().chain(&self.allow_change).chain(dynamic) {
            if !names.contains(&field.as_str()) {
                names.push(field);
            }
        }

        names
    }
}

impl<U, O: Identity> FieldPermissionConfigSet<U, O> {
    /// Fields the request's user may act on
    ///
    /// Static fields come first, then the fields of every dynamic config
    /// that grants `action`, in declaration order. Duplicates are kept.
    pub fn get_permitted_field_names(
        &self,
        action: FieldAction,
        ctx: &RequestContext<U>,
        obj: Option<&O>,
    ) -> Result<Vec<&str>> {
        let mut permitted: Vec<&str> = self.static_fields(action).iter().map(String::as_str).collect();

        for config in &self.field_config {
            if config.check(action, ctx, obj)? {
                permitted.extend(config.fields().iter().map(String::as_str));
            }
        }

        debug!(%action, fields = ?permitted, "permitted fields resolved");
        Ok(permitted)
    }

    /// Whether the request's user may act on one field
    ///
    /// Undeclared fields are never permitted.
    pub fn is_permitted_field(
        &self,
        action: FieldAction,
        field_name: &str,
        ctx: &RequestContext<U>,
        obj: Option<&O>,
    ) -> Result<bool> {
        if self.static_fields(action).iter().any(|field| field == field_name) {
            return Ok(true);
        }

        match self.field_config.iter().find(|config| config.contains(field_name)) {
            Some(config) => config.check(action, ctx, obj),
            None => Ok(false),
        }
    }
}

impl<U, O> Clone for FieldPermissionConfigSet<U, O> {
    fn clone(&self) -> Self {
        Self {
            field_config: self.field_config.clone(),
            allow_view: self.allow_view.clone(),
            allow_change: self.allow_change.clone(),
        }
    }
}

impl<U, O> fmt::Debug for FieldPermissionConfigSet<U, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPermissionConfigSet")
            .field("field_config", &self.field_config)
            .field("allow_view", &self.allow_view)
            .field("allow_change", &self.allow_change)
            .finish()
    }
}

pub struct FieldPermissionConfigSetBuilder<U, O> {
    field_config: Vec<FieldPermissionConfig<U, O>>,
    allow_view: Vec<String>,
    allow_change: Vec<String>,
}

impl<U, O> Default for FieldPermissionConfigSetBuilder<U, O> {
    fn default() -> Self {
        Self {
            field_config: Vec::new(),
            allow_view: Vec::new(),
            allow_change: Vec::new(),
        }
    }
}

impl<U, O> FieldPermissionConfigSetBuilder<U, O> {
    pub fn field(mut self, config: FieldPermissionConfig<U, O>) -> Self {
        self.field_config.push(config);
        self
    }

    pub fn allow_view<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_view.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn allow_change<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_change.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<FieldPermissionConfigSet<U, O>> {
        FieldPermissionConfigSet::new(self.field_config, self.allow_view, self.allow_change)
    }
}
