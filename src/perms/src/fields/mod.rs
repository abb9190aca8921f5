//! Field-level permissions
//!
//! A [`FieldPermissionConfig`] attaches a view rule and a change rule to a
//! group of fields. A [`FieldPermissionConfigSet`] combines configs with
//! static allow-lists and answers which fields a user may view or change on
//! an object.
//!
//! Static allow-lists are checked before any dynamic config, and a field may
//! not appear in both.
//!
//! # Example
//!
//! ```rust
//! use logical_perms::fields::{FieldAction, FieldPermissionConfig, FieldPermissionConfigSet};
//! use logical_perms::{Predicate, Principal, RequestContext};
//!
//! # fn example() -> logical_perms::Result<()> {
//! let is_staff = Predicate::from_fn("is_staff", |user: &Principal, _: Option<&Principal>| user.is_staff);
//!
//! let config_set = FieldPermissionConfigSet::builder()
//!     .field(FieldPermissionConfig::new(["email"])?.with_view(is_staff))
//!     .allow_view(["id", "username"])
//!     .build()?;
//!
//! let ctx = RequestContext::new(Principal::anonymous());
//! let visible = config_set.get_permitted_field_names(FieldAction::View, &ctx, None)?;
//! assert_eq!(visible, vec!["id", "username"]);
//! # Ok(())
//! # }
//! ```

mod config;
mod config_set;
mod document;

#[cfg(test)]
mod tests;

pub use config::{FieldPermissionConfig, FieldRule};
pub use config_set::{FieldPermissionConfigSet, FieldPermissionConfigSetBuilder};
pub use document::{ConfigSetDocument, FieldConfigDocument};

use crate::error::PermsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a user wants to do with a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldAction {
    View,
    Change,
}

impl FieldAction {
    pub const ALL: [FieldAction; 2] = [FieldAction::View, FieldAction::Change];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Change => "change",
        }
    }
}

impl FromStr for FieldAction {
    type Err = PermsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Self::View),
            "change" => Ok(Self::Change),
            other => Err(PermsError::InvalidAction(other.to_string())),
        }
    }
}

impl fmt::Display for FieldAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
