//! Per-field permission rules

use super::FieldAction;
use crate::error::{PermsError, Result};
use crate::predicate::{Predicate, RequestContext};
use crate::types::Identity;

use std::fmt;

/// A view or change rule: a fixed answer or a predicate
pub enum FieldRule<U, O> {
    Static(bool),
    Predicate(Predicate<U, O>),
}

impl<U, O> FieldRule<U, O> {
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }
}

impl<U, O: Identity> FieldRule<U, O> {
    /// Evaluate the rule, caching predicate results in the request context
    pub fn check(&self, ctx: &RequestContext<U>, obj: Option<&O>) -> Result<bool> {
        match self {
            Self::Static(allowed) => Ok(*allowed),
            Self::Predicate(predicate) => predicate.test(ctx, obj),
        }
    }
}

impl<U, O> Default for FieldRule<U, O> {
    fn default() -> Self {
        Self::Static(false)
    }
}

impl<U, O> Clone for FieldRule<U, O> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(allowed) => Self::Static(*allowed),
            Self::Predicate(predicate) => Self::Predicate(predicate.clone()),
        }
    }
}

impl<U, O> From<bool> for FieldRule<U, O> {
    fn from(allowed: bool) -> Self {
        Self::Static(allowed)
    }
}

impl<U, O> From<Predicate<U, O>> for FieldRule<U, O> {
    fn from(predicate: Predicate<U, O>) -> Self {
        Self::Predicate(predicate)
    }
}

impl<U, O> From<&Predicate<U, O>> for FieldRule<U, O> {
    fn from(predicate: &Predicate<U, O>) -> Self {
        Self::Predicate(predicate.clone())
    }
}

impl<U, O> fmt::Debug for FieldRule<U, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(allowed) => write!(f, "Static({})", allowed),
            Self::Predicate(predicate) => write!(f, "Predicate({})", predicate),
        }
    }
}

/// View and change rules for a group of fields
///
/// Both rules default to denying.
pub struct FieldPermissionConfig<U, O> {
    fields: Vec<String>,
    can_view: FieldRule<U, O>,
    can_change: FieldRule<U, O>,
}

impl<U, O> FieldPermissionConfig<U, O> {
    /// Create a config for `fields`, which must name at least one field
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();

        if fields.is_empty() {
            return Err(PermsError::InvalidConfig(
                "`fields` must specify at least one field".to_string(),
            ));
        }

        Ok(Self {
            fields,
            can_view: FieldRule::default(),
            can_change: FieldRule::default(),
        })
    }

    /// Set the view rule
    pub fn with_view(mut self, rule: impl Into<FieldRule<U, O>>) -> Self {
        self.can_view = rule.into();
        self
    }

    /// Set the change rule
    pub fn with_change(mut self, rule: impl Into<FieldRule<U, O>>) -> Self {
        self.can_change = rule.into();
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, field_name: &str) -> bool {
        self.fields.iter().any(|field| field == field_name)
    }

    /// The rule governing `action`
    pub fn rule(&self, action: FieldAction) -> &FieldRule<U, O> {
        match action {
            FieldAction::View => &self.can_view,
            FieldAction::Change => &self.can_change,
        }
    }
}

impl<U, O: Identity> FieldPermissionConfig<U, O> {
    pub fn can_view(&self, ctx: &RequestContext<U>, obj: Option<&O>) -> Result<bool> {
        self.can_view.check(ctx, obj)
    }

    pub fn can_change(&self, ctx: &RequestContext<U>, obj: Option<&O>) -> Result<bool> {
        self.can_change.check(ctx, obj)
    }

    /// Evaluate the rule for `action`
    pub fn check(&self, action: FieldAction, ctx: &RequestContext<U>, obj: Option<&O>) -> Result<bool> {
        self.rule(action).check(ctx, obj)
    }
}

impl<U, O> Clone for FieldPermissionConfig<U, O> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            can_view: self.can_view.clone(),
            can_change: self.can_change.clone(),
        }
    }
}

impl<U, O> fmt::Debug for FieldPermissionConfig<U, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPermissionConfig")
            .field("fields", &self.fields)
            .field("can_view", &self.can_view)
            .field("can_change", &self.can_change)
            .finish()
    }
}
