//! Permission predicates
//!
//! A [`Predicate`] is a boolean check over a user and an optional object.
//! Predicates are built once at startup and shared freely: cloning a
//! predicate clones a handle, not the evaluator.
//!
//! Composition is explicit. [`Predicate::and`], [`Predicate::or`],
//! [`Predicate::xor`] and [`Predicate::not`] build a new composite whose
//! operands are evaluated through [`Predicate::test`], so every operand
//! result is cached in the request context on its own.
//!
//! # Example
//!
//! ```rust
//! use logical_perms::{Predicate, Principal, RequestContext};
//!
//! # fn example() -> logical_perms::Result<()> {
//! let is_staff = Predicate::from_fn("is_staff", |user: &Principal, _obj: Option<&Principal>| user.is_staff);
//! let is_owner = Predicate::from_fn("is_owner", |user: &Principal, obj: Option<&Principal>| obj == Some(user));
//! let can_edit = is_staff.or(&is_owner);
//!
//! let alice = Principal::new("user:alice");
//! let ctx = RequestContext::new(alice.clone());
//! assert!(can_edit.test(&ctx, Some(&alice))?);
//! assert!(!can_edit.test(&ctx, Some(&Principal::new("user:bob")))?);
//! # Ok(())
//! # }
//! ```

pub mod context;

pub use context::{CacheKey, CacheStats, RequestContext, ResultCache};

use crate::config::{split_module_path, PermsConfig};
use crate::error::{PermsError, Result};
use crate::types::Identity;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

static NEXT_PREDICATE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique predicate identity
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct PredicateId(u64);

impl PredicateId {
    fn next() -> Self {
        Self(NEXT_PREDICATE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// A permission evaluator
///
/// Implement this for struct-style permissions. The evaluator must not
/// cache; caching is handled by [`Predicate::test`].
pub trait Evaluate<U, O>: Send + Sync {
    /// Whether the user holds the permission, optionally on an object
    fn has_permission(&self, user: &U, obj: Option<&O>) -> bool;

    /// Fixed label, overriding the label derived from the type name
    fn label(&self) -> Option<&str> {
        None
    }
}

/// Adapter from a plain function or closure to [`Evaluate`]
pub(crate) struct FnEvaluator<F>(pub(crate) F);

impl<U, O, F> Evaluate<U, O> for FnEvaluator<F>
where
    F: Fn(&U, Option<&O>) -> bool + Send + Sync,
{
    fn has_permission(&self, user: &U, obj: Option<&O>) -> bool {
        (self.0)(user, obj)
    }
}

/// The shape of a predicate
pub enum PredicateKind<U, O> {
    /// No evaluator; evaluating it is a programming error
    Abstract,
    /// Concrete evaluator
    Leaf(Box<dyn Evaluate<U, O>>),
    /// Both operands hold
    And(Predicate<U, O>, Predicate<U, O>),
    /// At least one operand holds
    Or(Predicate<U, O>, Predicate<U, O>),
    /// Exactly one operand holds
    Xor(Predicate<U, O>, Predicate<U, O>),
    /// The operand does not hold
    Not(Predicate<U, O>),
}

struct Inner<U, O> {
    id: PredicateId,
    name: String,
    label: Option<String>,
    kind: PredicateKind<U, O>,
}

/// A composable permission predicate over a user `U` and object `O`
pub struct Predicate<U, O> {
    inner: Arc<Inner<U, O>>,
}

impl<U, O> Clone for Predicate<U, O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<U, O> Predicate<U, O> {
    fn from_parts(name: String, label: Option<String>, kind: PredicateKind<U, O>) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: PredicateId::next(),
                name,
                label,
                kind,
            }),
        }
    }

    /// Create an unlabelled predicate from a function or closure
    pub fn from_fn<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&U, Option<&O>) -> bool + Send + Sync + 'static,
    {
        Self::leaf(name.into(), None, Box::new(FnEvaluator(func)))
    }

    /// Create a labelled predicate from a function or closure
    pub fn labelled<F>(label: impl Into<String>, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&U, Option<&O>) -> bool + Send + Sync + 'static,
    {
        Self::leaf(name.into(), Some(label.into()), Box::new(FnEvaluator(func)))
    }

    /// Create a predicate from a struct-style evaluator
    ///
    /// The label is the evaluator's own [`Evaluate::label`] if it has one,
    /// otherwise it is derived from the evaluator's type path through
    /// [`PermsConfig::label_format`].
    pub fn from_evaluator<E>(evaluator: E, config: &PermsConfig) -> Self
    where
        E: Evaluate<U, O> + 'static,
    {
        let (namespace, name) = split_module_path(std::any::type_name::<E>());
        let label = match evaluator.label() {
            Some(label) => label.to_string(),
            None => config.format_label(&namespace, &name),
        };

        Self::leaf(name, Some(label), Box::new(evaluator))
    }

    /// Create a predicate with no evaluator
    ///
    /// Calling [`Predicate::evaluate`] or [`Predicate::test`] on it fails
    /// with [`PermsError::Unimplemented`].
    pub fn unimplemented(name: impl Into<String>) -> Self {
        Self::from_parts(name.into(), None, PredicateKind::Abstract)
    }

    pub(crate) fn leaf(
        name: String,
        label: Option<String>,
        evaluator: Box<dyn Evaluate<U, O>>,
    ) -> Self {
        Self::from_parts(name, label, PredicateKind::Leaf(evaluator))
    }

    /// Both `self` and `other` hold
    pub fn and(&self, other: &Self) -> Self {
        Self::from_parts("And".to_string(), None, PredicateKind::And(self.clone(), other.clone()))
    }

    /// Either `self` or `other` holds
    pub fn or(&self, other: &Self) -> Self {
        Self::from_parts("Or".to_string(), None, PredicateKind::Or(self.clone(), other.clone()))
    }

    /// Exactly one of `self` and `other` holds
    pub fn xor(&self, other: &Self) -> Self {
        Self::from_parts("Xor".to_string(), None, PredicateKind::Xor(self.clone(), other.clone()))
    }

    /// `self` does not hold
    pub fn not(&self) -> Self {
        Self::from_parts("Not".to_string(), None, PredicateKind::Not(self.clone()))
    }

    pub fn id(&self) -> PredicateId {
        self.inner.id
    }

    /// Registration label, absent for composites and unlabelled predicates
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    /// Function or type name the predicate was built from
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn kind(&self) -> &PredicateKind<U, O> {
        &self.inner.kind
    }

    pub fn is_composite(&self) -> bool {
        !matches!(
            self.inner.kind,
            PredicateKind::Abstract | PredicateKind::Leaf(_)
        )
    }

    /// Whether two handles point at the same predicate
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<U, O: Identity> Predicate<U, O> {
    /// Evaluate without consulting the cache for this predicate
    ///
    /// Operands of composites still go through [`Predicate::test`].
    pub fn evaluate(&self, ctx: &RequestContext<U>, obj: Option<&O>) -> Result<bool> {
        match &self.inner.kind {
            PredicateKind::Abstract => Err(PermsError::Unimplemented(self.to_string())),
            PredicateKind::Leaf(evaluator) => Ok(evaluator.has_permission(ctx.user(), obj)),
            PredicateKind::And(a, b) => {
                if !a.test(ctx, obj)? {
                    return Ok(false);
                }
                b.test(ctx, obj)
            }
            PredicateKind::Or(a, b) => {
                if a.test(ctx, obj)? {
                    return Ok(true);
                }
                b.test(ctx, obj)
            }
            PredicateKind::Xor(a, b) => Ok(a.test(ctx, obj)? != b.test(ctx, obj)?),
            PredicateKind::Not(a) => Ok(!a.test(ctx, obj)?),
        }
    }

    /// Evaluate through the request context's result cache
    ///
    /// The first result for a given (predicate, object) pair is kept for
    /// the rest of the request. Errors are not cached.
    pub fn test(&self, ctx: &RequestContext<U>, obj: Option<&O>) -> Result<bool> {
        let key = CacheKey::new(self.id(), obj.map(Identity::identity));

        if let Some(result) = ctx.cache().get(&key) {
            return Ok(result);
        }

        let result = self.evaluate(ctx, obj)?;
        debug!(predicate = %self, result, "permission evaluated");
        ctx.cache().put(key, result);

        Ok(result)
    }
}

impl<U, O> fmt::Display for Predicate<U, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            PredicateKind::Abstract | PredicateKind::Leaf(_) => {
                write!(f, "P({})", self.label().unwrap_or(self.name()))
            }
            PredicateKind::And(a, b) => write!(f, "And<{}, {}>", a, b),
            PredicateKind::Or(a, b) => write!(f, "Or<{}, {}>", a, b),
            PredicateKind::Xor(a, b) => write!(f, "Xor<{}, {}>", a, b),
            PredicateKind::Not(a) => write!(f, "Not<{}>", a),
        }
    }
}

impl<U, O> fmt::Debug for Predicate<U, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("repr", &self.to_string())
            .finish()
    }
}
