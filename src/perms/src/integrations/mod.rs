//! Adapters for API layers
//!
//! - [`FieldPermissionsSerializer`] filters serialized objects on output and
//!   incoming partial updates on input.
//! - [`FieldPermissionsResource`] does the same for resource-style APIs that
//!   pass a [`Bundle`] through hydrate and dehydrate steps.
//! - [`ObjectAuthorization`] runs per-object permission checks against a
//!   [`PermissionBackend`](crate::PermissionBackend).

mod authorization;
mod resource;
mod serializer;

pub use authorization::ObjectAuthorization;
pub use resource::{Bundle, FieldPermissionsResource};
pub use serializer::FieldPermissionsSerializer;
