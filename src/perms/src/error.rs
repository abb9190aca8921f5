//! Error types for permission registration and evaluation

use thiserror::Error;

/// Permission layer errors
#[derive(Debug, Error)]
pub enum PermsError {
    /// No permission registered under the label
    #[error("Permission not found: no permission registered with the label '{0}'")]
    PermissionNotFound(String),

    /// Label already taken in the registry
    #[error("Duplicate permission: '{label}' is already registered to {existing}")]
    DuplicateLabel {
        /// The contested label
        label: String,
        /// Representation of the permission that holds the label
        existing: String,
    },

    /// Neither an explicit label nor the predicate's own label was available
    #[error("Missing label: {0} must have a label to be registered")]
    MissingLabel(String),

    /// Registration attempted after the registry was frozen
    #[error("Registry frozen: cannot register '{0}' after startup")]
    RegistryFrozen(String),

    /// Malformed field permission config or config set
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Field action outside of `view` and `change`
    #[error("Invalid action '{0}': only change and view are supported actions")]
    InvalidAction(String),

    /// An abstract predicate was evaluated
    #[error("Unimplemented: {0} has no evaluator")]
    Unimplemented(String),

    /// Declarative document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PermsError {
    /// Whether this is a lookup failure the backend converts into a denial
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PermissionNotFound(_))
    }
}

/// Result type for permission operations
pub type Result<T> = std::result::Result<T, PermsError>;
