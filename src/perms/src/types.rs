//! Core permission types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable identity of an object, used to key cached permission results.
///
/// Two objects with the same identity share cached results within a
/// request context, so the identity must distinguish every object a
/// predicate can tell apart.
pub trait Identity {
    /// Identity string for cache lookups
    fn identity(&self) -> String;
}

impl<T: Identity + ?Sized> Identity for &T {
    fn identity(&self) -> String {
        (**self).identity()
    }
}

impl Identity for str {
    fn identity(&self) -> String {
        self.to_string()
    }
}

impl Identity for String {
    fn identity(&self) -> String {
        self.clone()
    }
}

macro_rules! impl_identity_for_int {
    ($($t:ty),*) => {
        $(
            impl Identity for $t {
                fn identity(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_identity_for_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Principal (user, service account, anonymous visitor)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Principal identifier (e.g., "user:alice", "anonymous")
    pub id: String,

    /// Principal type (user, service, anonymous, etc.)
    #[serde(rename = "type")]
    pub principal_type: String,

    /// Whether the principal has staff privileges
    #[serde(default)]
    pub is_staff: bool,

    /// Additional attributes (e.g., department)
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl Principal {
    /// Create a new principal from an ID string
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let principal_type = id.split(':').next().unwrap_or("user").to_string();

        Self {
            id,
            principal_type,
            is_staff: false,
            attributes: HashMap::new(),
        }
    }

    /// The anonymous principal
    pub fn anonymous() -> Self {
        Self::new("anonymous")
    }

    /// Whether this is the anonymous principal
    pub fn is_anonymous(&self) -> bool {
        self.principal_type == "anonymous"
    }

    /// Mark the principal as staff
    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    /// Add an attribute to the principal
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

impl Identity for Principal {
    fn identity(&self) -> String {
        self.id.clone()
    }
}

/// Object a permission is checked against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource identifier (e.g., "document:123")
    pub id: String,

    /// Resource type (document, profile, etc.)
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Additional attributes (e.g., owner)
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl Resource {
    /// Create a new resource from an ID string
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let resource_type = id.split(':').next().unwrap_or("resource").to_string();

        Self {
            id,
            resource_type,
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute to the resource
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Whether the resource's `owner` attribute names the principal
    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        self.attribute("owner") == Some(principal.id.as_str())
    }
}

impl Identity for Resource {
    fn identity(&self) -> String {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_creation() {
        let principal = Principal::new("user:alice@example.com")
            .with_attribute("department", "engineering")
            .staff();

        assert_eq!(principal.id, "user:alice@example.com");
        assert_eq!(principal.principal_type, "user");
        assert!(principal.is_staff);
        assert_eq!(principal.attribute("department"), Some("engineering"));
        assert!(!principal.is_anonymous());
    }

    #[test]
    fn test_anonymous_principal() {
        let principal = Principal::anonymous();
        assert!(principal.is_anonymous());
        assert!(!principal.is_staff);
    }

    #[test]
    fn test_resource_ownership() {
        let alice = Principal::new("user:alice");
        let bob = Principal::new("user:bob");
        let doc = Resource::new("document:secret-123").with_attribute("owner", "user:alice");

        assert_eq!(doc.resource_type, "document");
        assert!(doc.is_owned_by(&alice));
        assert!(!doc.is_owned_by(&bob));
    }

    #[test]
    fn test_identity() {
        assert_eq!(Resource::new("document:1").identity(), "document:1");
        assert_eq!(42u64.identity(), "42");
        assert_eq!("a".identity(), "a");
        assert_eq!((&String::from("b")).identity(), "b");
    }
}
