//! Authorization backend over the permission registry

use crate::error::Result;
use crate::predicate::RequestContext;
use crate::registry::PermissionRegistry;
use crate::types::Identity;

use std::sync::Arc;
use tracing::warn;

/// Generic host authorization contract
///
/// Unknown labels are a denial, never an error. An error means a
/// programming mistake surfaced during evaluation.
pub trait PermissionBackend<U, O> {
    /// Whether the request's user holds `label`, optionally on `obj`
    fn has_perm(&self, ctx: &RequestContext<U>, label: &str, obj: Option<&O>) -> Result<bool>;

    /// Whether the request's user holds every label in `labels`
    fn has_perms(&self, ctx: &RequestContext<U>, labels: &[&str], obj: Option<&O>) -> Result<bool> {
        for label in labels {
            if !self.has_perm(ctx, label, obj)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Backend resolving labels through a [`PermissionRegistry`]
pub struct LogicalPermissionsBackend<U, O> {
    registry: Arc<PermissionRegistry<U, O>>,
}

impl<U, O> LogicalPermissionsBackend<U, O> {
    pub fn new(registry: Arc<PermissionRegistry<U, O>>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<PermissionRegistry<U, O>> {
        &self.registry
    }
}

impl<U, O> Clone for LogicalPermissionsBackend<U, O> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<U, O: Identity> PermissionBackend<U, O> for LogicalPermissionsBackend<U, O> {
    fn has_perm(&self, ctx: &RequestContext<U>, label: &str, obj: Option<&O>) -> Result<bool> {
        let predicate = match self.registry.get(label) {
            Ok(predicate) => predicate,
            Err(err) if err.is_not_found() => {
                warn!("Denying unknown permission '{}'", label);
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        predicate.test(ctx, obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::Predicate;
    use crate::types::{Principal, Resource};

    fn backend() -> LogicalPermissionsBackend<Principal, Resource> {
        let registry = Arc::new(PermissionRegistry::new());

        let is_staff = Predicate::labelled("docs.is_staff", "is_staff", |user: &Principal, _: Option<&Resource>| {
            user.is_staff
        });
        let is_owner = Predicate::labelled("docs.is_owner", "is_owner", |user: &Principal, obj: Option<&Resource>| {
            obj.is_some_and(|doc| doc.is_owned_by(user))
        });
        let broken = Predicate::unimplemented("broken");

        registry.register(&is_staff, None).unwrap();
        registry.register(&is_owner, None).unwrap();
        registry.register(&is_staff.or(&is_owner), Some("docs.can_edit")).unwrap();
        registry.register(&broken, Some("docs.broken")).unwrap();
        registry.freeze();

        LogicalPermissionsBackend::new(registry)
    }

    #[test]
    fn test_unknown_label_denies() {
        let backend = backend();
        let ctx = RequestContext::new(Principal::new("user:alice").staff());

        assert!(!backend.has_perm(&ctx, "docs.nope", None).unwrap());
    }

    #[test]
    fn test_has_perm() {
        let backend = backend();
        let alice = Principal::new("user:alice");
        let mine = Resource::new("document:1").with_attribute("owner", "user:alice");
        let theirs = Resource::new("document:2").with_attribute("owner", "user:bob");

        let ctx = RequestContext::new(alice);
        assert!(!backend.has_perm(&ctx, "docs.is_staff", None).unwrap());
        assert!(backend.has_perm(&ctx, "docs.can_edit", Some(&mine)).unwrap());
        assert!(!backend.has_perm(&ctx, "docs.can_edit", Some(&theirs)).unwrap());

        let ctx = RequestContext::new(Principal::new("user:carol").staff());
        assert!(backend.has_perm(&ctx, "docs.can_edit", Some(&theirs)).unwrap());
        assert!(backend.has_perm(&ctx, "docs.can_edit", None).unwrap());
    }

    #[test]
    fn test_has_perms_requires_all() {
        let backend = backend();
        let alice = Principal::new("user:alice");
        let mine = Resource::new("document:1").with_attribute("owner", "user:alice");
        let ctx = RequestContext::new(alice);

        assert!(backend.has_perms(&ctx, &["docs.is_owner", "docs.can_edit"], Some(&mine)).unwrap());
        assert!(!backend.has_perms(&ctx, &["docs.is_owner", "docs.is_staff"], Some(&mine)).unwrap());
        assert!(!backend.has_perms(&ctx, &["docs.is_owner", "docs.missing"], Some(&mine)).unwrap());
        assert!(backend.has_perms(&ctx, &[], None).unwrap());
    }

    #[test]
    fn test_programming_errors_surface() {
        let backend = backend();
        let ctx = RequestContext::new(Principal::anonymous());

        assert!(backend.has_perm(&ctx, "docs.broken", None).is_err());
    }
}
