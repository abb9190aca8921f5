//! Permission layer configuration

use serde::Deserialize;

/// Placeholder for the namespace part of a derived label
pub const APP_NAME_PLACEHOLDER: &str = "{app_name}";

/// Placeholder for the identifier part of a derived label
pub const PERMISSION_NAME_PLACEHOLDER: &str = "{permission_name}";

/// Default template for derived labels
pub const DEFAULT_LABEL_FORMAT: &str = "{app_name}.{permission_name}";

/// Default name of an application's permissions module
pub const DEFAULT_MODULE_NAME: &str = "permissions";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PermsConfig {
    /// Register permissions built with the `permission!` macro unless told otherwise
    pub default_register: bool,

    /// Template for derived labels, see [`PermsConfig::format_label`]
    pub label_format: String,

    /// Name of the per-application permissions module
    pub module_name: String,
}

impl Default for PermsConfig {
    fn default() -> Self {
        Self {
            default_register: false,
            label_format: DEFAULT_LABEL_FORMAT.to_string(),
            module_name: DEFAULT_MODULE_NAME.to_string(),
        }
    }
}

impl PermsConfig {
    /// Defaults overlaid with environment variables
    ///
    /// - `PERMISSIONS_DEFAULT_REGISTER_WITH_BACKEND` (`true`/`false`/`1`/`0`)
    /// - `PERMISSION_DEFAULT_LABEL_FORMAT`
    /// - `PERMISSIONS_MODULE_NAME`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(register) = std::env::var("PERMISSIONS_DEFAULT_REGISTER_WITH_BACKEND")
            .ok()
            .and_then(|s| parse_flag(&s))
        {
            config.default_register = register;
        }

        if let Ok(format) = std::env::var("PERMISSION_DEFAULT_LABEL_FORMAT") {
            config.label_format = format;
        }

        if let Ok(name) = std::env::var("PERMISSIONS_MODULE_NAME") {
            config.module_name = name;
        }

        config
    }

    /// Render a label from the configured template
    ///
    /// ```rust
    /// use logical_perms::PermsConfig;
    ///
    /// let config = PermsConfig::default();
    /// assert_eq!(config.format_label("blog", "can_publish"), "blog.can_publish");
    /// ```
    pub fn format_label(&self, app_name: &str, permission_name: &str) -> String {
        self.label_format
            .replace(APP_NAME_PLACEHOLDER, app_name)
            .replace(PERMISSION_NAME_PLACEHOLDER, permission_name)
    }

    /// Dotted path of an application's permissions module, used in logs
    pub fn module_path(&self, app_name: &str) -> String {
        format!("{}.{}", app_name, self.module_name)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Split a type path into a dotted namespace and the type name
///
/// The namespace is that of the type's module, as given by [`namespace_of`],
/// so types and functions defined side by side share it. A single-segment
/// path is its own namespace. Generic arguments are ignored.
pub fn split_module_path(path: &str) -> (String, String) {
    let path = path.split('<').next().unwrap_or(path);
    let segments: Vec<&str> = path.split("::").filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [] => (String::new(), String::new()),
        [only] => (only.to_string(), only.to_string()),
        [module @ .., leaf] => (namespace_of(&module.join("::")), leaf.to_string()),
    }
}

/// Namespace for a function defined in `module_path`
///
/// `blog::permissions` yields `blog`; a crate root yields the crate name.
pub fn namespace_of(module_path: &str) -> String {
    let segments: Vec<&str> = module_path.split("::").filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [namespace @ .., _] => namespace.join("."),
    }
}
