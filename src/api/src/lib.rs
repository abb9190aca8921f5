//! Logical Permissions demo API
//!
//! A users REST API showing field-level permissions at the HTTP boundary.
//!
//! ## Features
//!
//! - **Field filtering**: every response only carries the fields the acting
//!   user may view
//! - **Partial updates**: fields the acting user may not change are dropped
//!   before an update is applied
//! - **Two styles**: serializer-style routes under `/v1`, resource-style
//!   routes under `/v2`
//!
//! The acting user is named by the `x-user-id` header. A missing or unknown
//! id means an anonymous user.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod permissions;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use handlers::health::HealthResponse;
pub use models::{User, UserStore, Viewer};
pub use routes::build_router;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use logical_perms::PermsConfig;

    #[test]
    fn test_router_builds() {
        let state = AppState::new(UserStore::seeded(), PermsConfig::default()).unwrap();
        let _router = build_router(state);
    }
}
