//! Resource-style field filtering

use crate::error::{PermsError, Result};
use crate::fields::{FieldAction, FieldPermissionConfigSet};
use crate::predicate::RequestContext;
use crate::types::Identity;

use serde::Serialize;
use serde_json::{Map, Value};

/// An object and its field data on the way through a resource
#[derive(Debug, Clone)]
pub struct Bundle<O> {
    pub obj: Option<O>,
    pub data: Map<String, Value>,
}

impl<O> Bundle<O> {
    pub fn new(obj: Option<O>, data: Map<String, Value>) -> Self {
        Self { obj, data }
    }
}

impl<O: Serialize> Bundle<O> {
    /// A bundle carrying every serialized field of `obj`
    pub fn from_object(obj: O) -> Result<Self> {
        match serde_json::to_value(&obj)? {
            Value::Object(data) => Ok(Self::new(Some(obj), data)),
            _ => Err(PermsError::InvalidConfig(
                "bundle objects must serialize to a JSON object".to_string(),
            )),
        }
    }
}

/// Field permissions for resources that hydrate and dehydrate bundles
///
/// Implementors only provide the config set. Hydrating keeps the fields the
/// user may change; dehydrating keeps the fields the user may view.
pub trait FieldPermissionsResource<U, O: Identity> {
    fn field_permissions(&self) -> &FieldPermissionConfigSet<U, O>;

    /// Drop the bundle fields not permitted for `action`
    fn update_bundle_fields(
        &self,
        ctx: &RequestContext<U>,
        bundle: &mut Bundle<O>,
        action: FieldAction,
    ) -> Result<()> {
        let allowed = self
            .field_permissions()
            .get_permitted_field_names(action, ctx, bundle.obj.as_ref())?;

        bundle.data.retain(|field, _| allowed.contains(&field.as_str()));
        Ok(())
    }

    fn hydrate(&self, ctx: &RequestContext<U>, mut bundle: Bundle<O>) -> Result<Bundle<O>> {
        self.update_bundle_fields(ctx, &mut bundle, FieldAction::Change)?;
        Ok(bundle)
    }

    fn dehydrate(&self, ctx: &RequestContext<U>, mut bundle: Bundle<O>) -> Result<Bundle<O>> {
        self.update_bundle_fields(ctx, &mut bundle, FieldAction::View)?;
        Ok(bundle)
    }
}
