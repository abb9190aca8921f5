//! Users, the acting viewer and the user store

use crate::error::{ApiError, ApiResult};
use logical_perms::Identity;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_staff: bool,
}

impl User {
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            id,
            email: format!("{}@localhost", username),
            username,
            first_name: String::new(),
            last_name: String::new(),
            is_staff: false,
        }
    }

    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    /// Apply an already filtered partial update
    ///
    /// Fields the model does not know are ignored.
    pub fn apply_changes(&mut self, data: &Map<String, Value>) -> ApiResult<()> {
        for (field, value) in data {
            let target = match field.as_str() {
                "username" => &mut self.username,
                "first_name" => &mut self.first_name,
                "last_name" => &mut self.last_name,
                "email" => &mut self.email,
                _ => continue,
            };

            match value {
                Value::String(s) => *target = s.clone(),
                other => {
                    return Err(ApiError::InvalidInput(format!(
                        "`{}` must be a string, got {}",
                        field, other
                    )))
                }
            }
        }

        Ok(())
    }
}

impl Identity for User {
    fn identity(&self) -> String {
        format!("user:{}", self.id)
    }
}

/// The user a request acts as; anonymous when no known user is given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer(Option<User>);

impl Viewer {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(user: User) -> Self {
        Self(Some(user))
    }

    pub fn as_user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.is_none()
    }

    pub fn is_staff(&self) -> bool {
        self.0.as_ref().is_some_and(|user| user.is_staff)
    }

    /// Whether the viewer is `user`
    pub fn is(&self, user: &User) -> bool {
        self.0.as_ref().is_some_and(|me| me.id == user.id)
    }
}

/// In-memory users keyed by id
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<BTreeMap<u64, User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::new();
        for user in users {
            store.insert(user);
        }
        store
    }

    /// One staff member and two regular users
    pub fn seeded() -> Self {
        Self::with_users([
            User::new(1, "user1").staff(),
            User::new(2, "user2"),
            User::new(3, "user3"),
        ])
    }

    pub fn insert(&self, user: User) {
        self.users.write().insert(user.id, user);
    }

    pub fn get(&self, id: u64) -> Option<User> {
        self.users.read().get(&id).cloned()
    }

    /// Every user, ordered by id
    pub fn list(&self) -> Vec<User> {
        self.users.read().values().cloned().collect()
    }

    /// Replace a stored user; fails when the id is unknown
    pub fn update(&self, user: User) -> ApiResult<User> {
        let mut users = self.users.write();
        match users.get_mut(&user.id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(user)
            }
            None => Err(ApiError::NotFound(format!("user {}", user.id))),
        }
    }

    /// Resolve the `x-user-id` header value into a viewer
    pub fn viewer(&self, user_id: Option<&str>) -> Viewer {
        user_id
            .and_then(|id| id.trim().parse().ok())
            .and_then(|id| self.get(id))
            .map(Viewer::user)
            .unwrap_or_default()
    }
}
