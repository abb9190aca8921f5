//! Label to predicate registry
//!
//! The registry is filled during startup and then frozen. It is append-only:
//! a label, once taken, stays bound to its predicate for the life of the
//! registry. Share it behind an `Arc` with whatever needs lookups.

use crate::error::{PermsError, Result};
use crate::predicate::Predicate;

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

pub struct PermissionRegistry<U, O> {
    permissions: RwLock<HashMap<String, Predicate<U, O>>>,
    frozen: AtomicBool,
}

impl<U, O> PermissionRegistry<U, O> {
    pub fn new() -> Self {
        Self {
            permissions: RwLock::new(HashMap::new()),
            frozen: AtomicBool::new(false),
        }
    }

    /// Register a predicate
    ///
    /// An explicit `label` wins over the predicate's own label. Fails when
    /// no label resolves, when the label is taken, or when the registry has
    /// been frozen. Returns the label the predicate was registered under.
    pub fn register(&self, predicate: &Predicate<U, O>, label: Option<&str>) -> Result<String> {
        let label = label
            .or_else(|| predicate.label())
            .ok_or_else(|| PermsError::MissingLabel(predicate.to_string()))?
            .to_string();

        let mut permissions = self.permissions.write();

        if self.is_frozen() {
            return Err(PermsError::RegistryFrozen(label));
        }

        if let Some(existing) = permissions.get(&label) {
            return Err(PermsError::DuplicateLabel {
                label,
                existing: existing.to_string(),
            });
        }

        info!("Registered permission {} as '{}'", predicate, label);
        permissions.insert(label.clone(), predicate.clone());

        Ok(label)
    }

    /// Look up a predicate by label
    pub fn get(&self, label: &str) -> Result<Predicate<U, O>> {
        self.permissions
            .read()
            .get(label)
            .cloned()
            .ok_or_else(|| PermsError::PermissionNotFound(label.to_string()))
    }

    /// Snapshot of every registered predicate
    pub fn get_all(&self) -> HashMap<String, Predicate<U, O>> {
        self.permissions.read().clone()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.permissions.read().contains_key(label)
    }

    /// Registered labels, sorted
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.permissions.read().keys().cloned().collect();
        labels.sort();
        labels
    }

    pub fn len(&self) -> usize {
        self.permissions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.read().is_empty()
    }

    /// End the registration phase; later registrations fail
    pub fn freeze(&self) {
        // Held so no registration straddles the flag flip
        let permissions = self.permissions.write();
        if !self.frozen.swap(true, Ordering::SeqCst) {
            info!("Permission registry frozen with {} permissions", permissions.len());
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }
}

impl<U, O> Default for PermissionRegistry<U, O> {
    fn default() -> Self {
        Self::new()
    }
}
