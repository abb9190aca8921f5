//! Object-level authorization checks

use crate::backend::PermissionBackend;
use crate::error::Result;
use crate::predicate::RequestContext;

/// Per-object permission checks over a [`PermissionBackend`]
///
/// An object passes when the user holds the permission on it, or holds the
/// permission globally.
#[derive(Debug, Clone)]
pub struct ObjectAuthorization<B> {
    backend: B,
}

impl<B> ObjectAuthorization<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Check one object
    pub fn check_user_perm<U, O>(&self, ctx: &RequestContext<U>, permission: &str, obj: &O) -> Result<bool>
    where
        B: PermissionBackend<U, O>,
    {
        Ok(self.backend.has_perm(ctx, permission, Some(obj))?
            || self.backend.has_perm(ctx, permission, None)?)
    }

    /// Check every object; an empty list passes
    pub fn check_user_perm_list<U, O>(&self, ctx: &RequestContext<U>, permission: &str, objs: &[O]) -> Result<bool>
    where
        B: PermissionBackend<U, O>,
    {
        for obj in objs {
            if !self.check_user_perm(ctx, permission, obj)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The objects the user holds `permission` on, in order
    pub fn filter_permitted<'a, U, O>(
        &self,
        ctx: &RequestContext<U>,
        permission: &str,
        objs: &'a [O],
    ) -> Result<Vec<&'a O>>
    where
        B: PermissionBackend<U, O>,
    {
        let mut permitted = Vec::with_capacity(objs.len());
        for obj in objs {
            if self.check_user_perm(ctx, permission, obj)? {
                permitted.push(obj);
            }
        }
        Ok(permitted)
    }
}
