//! Function-to-permission builder
//!
//! Turns a plain evaluator function into a [`Predicate`], deriving its label
//! from the defining module and the function name, and optionally
//! registering it.
//!
//! ```rust
//! use logical_perms::{permission, PermissionRegistry, PermsConfig, Principal};
//!
//! fn is_staff(user: &Principal, _obj: Option<&Principal>) -> bool {
//!     user.is_staff
//! }
//!
//! # fn example() -> logical_perms::Result<()> {
//! let config = PermsConfig::default();
//! let registry = PermissionRegistry::new();
//!
//! let is_staff = permission!(is_staff).register(true).build(&config, &registry)?;
//! assert!(registry.get(is_staff.label().unwrap_or_default()).is_ok());
//! # Ok(())
//! # }
//! ```

use crate::config::{namespace_of, PermsConfig};
use crate::error::Result;
use crate::predicate::{Evaluate, FnEvaluator, Predicate};
use crate::registry::PermissionRegistry;

/// Build a [`PermissionBuilder`] from a function, capturing its module path
#[macro_export]
macro_rules! permission {
    ($func:ident) => {
        $crate::PermissionBuilder::new(module_path!(), stringify!($func), $func)
    };
}

pub struct PermissionBuilder<U, O> {
    namespace: String,
    name: String,
    evaluator: Box<dyn Evaluate<U, O>>,
    label: Option<String>,
    register: Option<bool>,
}

impl<U, O> PermissionBuilder<U, O> {
    /// Start from an evaluator function defined in `module_path`
    pub fn new<F>(module_path: &str, name: &str, func: F) -> Self
    where
        F: Fn(&U, Option<&O>) -> bool + Send + Sync + 'static,
    {
        Self {
            namespace: namespace_of(module_path),
            name: name.to_string(),
            evaluator: Box::new(FnEvaluator(func)),
            label: None,
            register: None,
        }
    }

    /// Use `label` as is instead of deriving one
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Register with the registry on build; unset means
    /// [`PermsConfig::default_register`]
    pub fn register(mut self, register: bool) -> Self {
        self.register = Some(register);
        self
    }

    /// Label the predicate will carry
    pub fn resolved_label(&self, config: &PermsConfig) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => config.format_label(&self.namespace, &self.name),
        }
    }

    /// Build the predicate, registering it if requested
    pub fn build(
        self,
        config: &PermsConfig,
        registry: &PermissionRegistry<U, O>,
    ) -> Result<Predicate<U, O>> {
        let register = self.register.unwrap_or(config.default_register);
        let predicate = self.build_unregistered(config);

        if register {
            registry.register(&predicate, None)?;
        }

        Ok(predicate)
    }

    /// Build the predicate without touching any registry
    pub fn build_unregistered(self, config: &PermsConfig) -> Predicate<U, O> {
        let label = self.resolved_label(config);
        Predicate::leaf(self.name, Some(label), self.evaluator)
    }
}
