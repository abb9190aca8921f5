//! Startup registration phase
//!
//! Each application exposes an optional registration function. The host
//! hands the full list of applications to a [`PermissionLoader`] once at
//! startup; the loader calls every registration function in order and then
//! freezes the registry.

use crate::config::PermsConfig;
use crate::error::Result;
use crate::registry::PermissionRegistry;

use std::sync::Arc;
use tracing::{debug, info};

/// Registration function an application exposes for its permissions
pub type RegisterFn<U, O> = fn(&PermsConfig, &PermissionRegistry<U, O>) -> Result<()>;

/// An installed application
pub struct AppModule<U, O> {
    name: String,
    register: Option<RegisterFn<U, O>>,
}

impl<U, O> AppModule<U, O> {
    /// An application without permissions
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            register: None,
        }
    }

    /// Attach the application's registration function
    pub fn with_permissions(mut self, register: RegisterFn<U, O>) -> Self {
        self.register = Some(register);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_permissions(&self) -> bool {
        self.register.is_some()
    }
}

/// Outcome of a load: which applications had permissions to register
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub entries: Vec<(String, bool)>,
}

impl LoadReport {
    /// Names of applications whose permissions were registered, in load order
    pub fn loaded(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, loaded)| *loaded)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Names of applications that had nothing to register
    pub fn skipped(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, loaded)| !*loaded)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

pub struct PermissionLoader<U, O> {
    config: PermsConfig,
    registry: Arc<PermissionRegistry<U, O>>,
}

impl<U, O> PermissionLoader<U, O> {
    pub fn new(config: PermsConfig, registry: Arc<PermissionRegistry<U, O>>) -> Self {
        Self { config, registry }
    }

    pub fn registry(&self) -> &Arc<PermissionRegistry<U, O>> {
        &self.registry
    }

    /// Run every application's registration function
    ///
    /// Applications without permissions are skipped. The first registration
    /// error aborts the load and is returned.
    pub fn load_all(&self, apps: &[AppModule<U, O>]) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        for app in apps {
            let loaded = self.load(app)?;
            report.entries.push((app.name.clone(), loaded));
        }

        Ok(report)
    }

    /// Run one application's registration function
    pub fn load(&self, app: &AppModule<U, O>) -> Result<bool> {
        let Some(register) = app.register else {
            debug!("No permissions module for {}", app.name);
            return Ok(false);
        };

        register(&self.config, &self.registry)?;
        info!("Loaded permissions from {}", self.config.module_path(&app.name));

        Ok(true)
    }

    /// Load every application and freeze the registry
    pub fn load_and_freeze(&self, apps: &[AppModule<U, O>]) -> Result<LoadReport> {
        let report = self.load_all(apps)?;
        self.registry.freeze();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PermsError;
    use crate::permission;
    use crate::types::Principal;

    type Registry = PermissionRegistry<Principal, Principal>;

    fn is_staff(user: &Principal, _obj: Option<&Principal>) -> bool {
        user.is_staff
    }

    fn register_staff(config: &PermsConfig, registry: &Registry) -> Result<()> {
        permission!(is_staff).register(true).build(config, registry)?;
        Ok(())
    }

    fn register_staff_again(config: &PermsConfig, registry: &Registry) -> Result<()> {
        permission!(is_staff).register(true).build(config, registry)?;
        Ok(())
    }

    #[test]
    fn test_load_all() {
        let registry = Arc::new(Registry::new());
        let loader = PermissionLoader::new(PermsConfig::default(), Arc::clone(&registry));

        let apps = vec![
            AppModule::new("auth"),
            AppModule::new("staff").with_permissions(register_staff),
        ];

        let report = loader.load_all(&apps).unwrap();
        assert_eq!(report.loaded(), vec!["staff"]);
        assert_eq!(report.skipped(), vec!["auth"]);
        assert!(registry.contains("logical_perms.loader.is_staff"));
        assert!(!registry.is_frozen());
    }

    #[test]
    fn test_registration_errors_propagate() {
        let registry = Arc::new(Registry::new());
        let loader = PermissionLoader::new(PermsConfig::default(), Arc::clone(&registry));

        let apps = vec![
            AppModule::new("a").with_permissions(register_staff),
            AppModule::new("b").with_permissions(register_staff_again),
        ];

        let err = loader.load_all(&apps).unwrap_err();
        assert!(matches!(err, PermsError::DuplicateLabel { .. }));
    }

    #[test]
    fn test_load_and_freeze() {
        let registry = Arc::new(Registry::new());
        let loader = PermissionLoader::new(PermsConfig::default(), Arc::clone(&registry));

        let apps = vec![AppModule::new("staff").with_permissions(register_staff)];
        loader.load_and_freeze(&apps).unwrap();

        assert!(registry.is_frozen());
        assert!(matches!(
            loader.load(&apps[0]),
            Err(PermsError::RegistryFrozen(_))
        ));
    }
}
