//! Shared application state

use crate::models::{User, UserStore, Viewer};
use crate::permissions::{self, UserRegistry};
use axum::http::HeaderMap;
use logical_perms::fields::FieldPermissionConfigSet;
use logical_perms::integrations::FieldPermissionsResource;
use logical_perms::{
    AppModule, FieldPermissionsSerializer, LogicalPermissionsBackend, LoadReport, PermissionLoader,
    PermsConfig, RequestContext,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Header carrying the acting user's id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Resource-style view of the users, filtering bundles on hydrate and dehydrate
pub struct UserResource {
    field_permissions: Arc<FieldPermissionConfigSet<Viewer, User>>,
}

impl FieldPermissionsResource<Viewer, User> for UserResource {
    fn field_permissions(&self) -> &FieldPermissionConfigSet<Viewer, User> {
        &self.field_permissions
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UserStore>,
    pub backend: LogicalPermissionsBackend<Viewer, User>,
    pub serializer: FieldPermissionsSerializer<Viewer, User>,
    pub resource: Arc<UserResource>,
    pub start_time: Instant,
}

impl AppState {
    /// Run the permission registration phase and wire up the users app
    pub fn new(store: UserStore, config: PermsConfig) -> logical_perms::Result<Self> {
        let registry = Arc::new(UserRegistry::new());
        let loader = PermissionLoader::new(config, Arc::clone(&registry));

        let report: LoadReport = loader.load_and_freeze(&Self::apps())?;
        info!("Permission modules loaded: {:?}", report.loaded());

        let field_permissions = Arc::new(permissions::user_field_permissions(&registry)?);

        Ok(Self {
            store: Arc::new(store),
            backend: LogicalPermissionsBackend::new(registry),
            serializer: FieldPermissionsSerializer::new(Arc::clone(&field_permissions)),
            resource: Arc::new(UserResource { field_permissions }),
            start_time: Instant::now(),
        })
    }

    /// Installed applications, in load order
    fn apps() -> Vec<AppModule<Viewer, User>> {
        vec![
            AppModule::new("auth"),
            AppModule::new("users").with_permissions(permissions::register),
        ]
    }

    /// Fresh request context for the user named by [`USER_ID_HEADER`]
    pub fn request_context(&self, headers: &HeaderMap) -> RequestContext<Viewer> {
        let user_id = headers.get(USER_ID_HEADER).and_then(|value| value.to_str().ok());
        RequestContext::new(self.store.viewer(user_id))
    }
}
