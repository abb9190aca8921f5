//! # Logical Permissions
//!
//! Composable permission predicates with per-request caching, a label
//! registry, and field-level authorization.
//!
//! ## Features
//!
//! - **Predicates** combined with `and`, `or`, `xor` and `not`
//! - **Request-scoped caching** of every predicate and operand result
//! - **Registry** mapping labels to predicates, frozen after startup
//! - **Field permissions** deciding which fields a user may view or change
//! - **Integrations** for serializers, resources and object authorization
//!
//! ## Example
//!
//! ```rust
//! use logical_perms::{
//!     LogicalPermissionsBackend, PermissionBackend, PermissionRegistry, Predicate, Principal,
//!     RequestContext, Resource,
//! };
//! use std::sync::Arc;
//!
//! # fn example() -> logical_perms::Result<()> {
//! let is_staff = Predicate::labelled("docs.is_staff", "is_staff", |user: &Principal, _: Option<&Resource>| {
//!     user.is_staff
//! });
//! let is_owner = Predicate::labelled("docs.is_owner", "is_owner", |user: &Principal, doc: Option<&Resource>| {
//!     doc.is_some_and(|doc| doc.is_owned_by(user))
//! });
//!
//! let registry = Arc::new(PermissionRegistry::new());
//! registry.register(&is_staff.or(&is_owner), Some("docs.can_edit"))?;
//! registry.freeze();
//!
//! let backend = LogicalPermissionsBackend::new(registry);
//! let doc = Resource::new("document:1").with_attribute("owner", "user:alice");
//! let ctx = RequestContext::new(Principal::new("user:alice"));
//!
//! assert!(backend.has_perm(&ctx, "docs.can_edit", Some(&doc))?);
//! assert!(!backend.has_perm(&ctx, "docs.unknown", Some(&doc))?);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod decorators;
pub mod error;
pub mod fields;
pub mod integrations;
pub mod loader;
pub mod predicate;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use backend::{LogicalPermissionsBackend, PermissionBackend};
pub use config::PermsConfig;
pub use decorators::PermissionBuilder;
pub use error::{PermsError, Result};
pub use fields::{FieldAction, FieldPermissionConfig, FieldPermissionConfigSet, FieldRule};
pub use integrations::{FieldPermissionsSerializer, ObjectAuthorization};
pub use loader::{AppModule, LoadReport, PermissionLoader, RegisterFn};
pub use predicate::{CacheStats, Evaluate, Predicate, PredicateId, PredicateKind, RequestContext};
pub use registry::PermissionRegistry;
pub use types::{Identity, Principal, Resource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
