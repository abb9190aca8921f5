//! Users app permissions
//!
//! - Everyone can view the id, username, first name and last name of all
//!   users.
//! - Staff can change every user's first name, last name and email.
//! - Users can change their own first name, last name and email.
//! - Everyone can view staff email addresses; users can view their own.

use crate::models::{User, Viewer};
use logical_perms::fields::{FieldPermissionConfig, FieldPermissionConfigSet};
use logical_perms::{permission, PermissionRegistry, PermsConfig};

pub const CAN_CHANGE_PROFILE: &str = "users.can_change_profile";
pub const CAN_VIEW_EMAIL: &str = "users.can_view_email";

pub type UserRegistry = PermissionRegistry<Viewer, User>;

/// Staff can change everyone's profile, users only their own
pub fn can_change_profile(viewer: &Viewer, obj: Option<&User>) -> bool {
    viewer.is_staff() || obj.is_some_and(|user| viewer.is(user))
}

/// Staff emails and your own
pub fn can_view_email(viewer: &Viewer, obj: Option<&User>) -> bool {
    obj.is_some_and(|user| user.is_staff || viewer.is(user))
}

/// Registration function for the users app
pub fn register(config: &PermsConfig, registry: &UserRegistry) -> logical_perms::Result<()> {
    permission!(can_change_profile)
        .label(CAN_CHANGE_PROFILE)
        .register(true)
        .build(config, registry)?;
    permission!(can_view_email)
        .label(CAN_VIEW_EMAIL)
        .register(true)
        .build(config, registry)?;
    Ok(())
}

/// Field permissions for [`User`]
pub fn user_field_permissions(registry: &UserRegistry) -> logical_perms::Result<FieldPermissionConfigSet<Viewer, User>> {
    let can_change_profile = registry.get(CAN_CHANGE_PROFILE)?;
    let can_view_email = registry.get(CAN_VIEW_EMAIL)?;

    FieldPermissionConfigSet::builder()
        .field(
            FieldPermissionConfig::new(["first_name", "last_name"])?
                .with_view(true)
                .with_change(&can_change_profile),
        )
        .field(
            FieldPermissionConfig::new(["email"])?
                .with_view(can_change_profile.or(&can_view_email))
                .with_change(&can_change_profile),
        )
        .allow_view(["id", "username"])
        .build()
}
