//! Field-filtering serializer

use crate::error::{PermsError, Result};
use crate::fields::{FieldAction, FieldPermissionConfigSet};
use crate::predicate::RequestContext;
use crate::types::Identity;

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Serializer applying a [`FieldPermissionConfigSet`] per object
///
/// Output keeps only the fields the user may view. Input drops every field
/// the user may not change before the update is applied.
pub struct FieldPermissionsSerializer<U, O> {
    field_permissions: Arc<FieldPermissionConfigSet<U, O>>,
}

impl<U, O> FieldPermissionsSerializer<U, O> {
    pub fn new(field_permissions: Arc<FieldPermissionConfigSet<U, O>>) -> Self {
        Self { field_permissions }
    }

    pub fn field_permissions(&self) -> &FieldPermissionConfigSet<U, O> {
        &self.field_permissions
    }
}

impl<U, O> Clone for FieldPermissionsSerializer<U, O> {
    fn clone(&self) -> Self {
        Self {
            field_permissions: Arc::clone(&self.field_permissions),
        }
    }
}

impl<U, O: Identity> FieldPermissionsSerializer<U, O> {
    /// Serialize `instance`, keeping only viewable fields
    pub fn to_representation(&self, ctx: &RequestContext<U>, instance: &O) -> Result<Map<String, Value>>
    where
        O: Serialize,
    {
        let Value::Object(data) = serde_json::to_value(instance)? else {
            return Err(PermsError::InvalidConfig(format!(
                "{} does not serialize to an object",
                instance.identity()
            )));
        };

        self.filter_representation(ctx, Some(instance), data)
    }

    /// Serialize every instance; the permitted fields are resolved per object
    pub fn to_representation_many(&self, ctx: &RequestContext<U>, instances: &[O]) -> Result<Vec<Map<String, Value>>>
    where
        O: Serialize,
    {
        instances
            .iter()
            .map(|instance| self.to_representation(ctx, instance))
            .collect()
    }

    /// Drop every field of `data` the user may not view on `obj`
    pub fn filter_representation(
        &self,
        ctx: &RequestContext<U>,
        obj: Option<&O>,
        mut data: Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        let allowed = self
            .field_permissions
            .get_permitted_field_names(FieldAction::View, ctx, obj)?;

        data.retain(|field, _| allowed.contains(&field.as_str()));
        Ok(data)
    }

    /// Remove the fields of an incoming update the user may not change
    ///
    /// Returns the names of the removed fields.
    pub fn filter_initial_data(
        &self,
        ctx: &RequestContext<U>,
        obj: Option<&O>,
        data: &mut Map<String, Value>,
    ) -> Result<Vec<String>> {
        let mut disallowed = Vec::new();

        for field in data.keys() {
            if !self
                .field_permissions
                .is_permitted_field(FieldAction::Change, field, ctx, obj)?
            {
                disallowed.push(field.clone());
            }
        }

        for field in &disallowed {
            data.remove(field);
        }

        if !disallowed.is_empty() {
            debug!(fields = ?disallowed, "dropped unchangeable fields");
        }

        Ok(disallowed)
    }
}
