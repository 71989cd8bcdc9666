//! Profile defaults and derived values (bundle identifier, status item title).

use crate::profile::model::{InterfaceType, Profile, StatusItemDisplayType};
use serde::{Deserialize, Serialize};

pub const DEFAULT_APP_NAME: &str = "MyPlatypusApp";
pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_INTERPRETER: &str = "/bin/sh";
pub const DEFAULT_IDENTIFIER_PREFIX: &str = "org";
pub const DEFAULT_TEXT_FONT: &str = "Monaco 13";
pub const DEFAULT_TEXT_FOREGROUND: &str = "#000000";
pub const DEFAULT_TEXT_BACKGROUND: &str = "#ffffff";

/// User-level defaults applied before any option is parsed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDefaults {
    /// App name when neither `--name` nor a script name is available
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Author; falls back to the login user when unset
    #[serde(default)]
    pub author: Option<String>,

    /// First component of generated bundle identifiers
    #[serde(default = "default_identifier_prefix")]
    pub identifier_prefix: String,
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_identifier_prefix() -> String {
    DEFAULT_IDENTIFIER_PREFIX.to_string()
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            author: None,
            identifier_prefix: default_identifier_prefix(),
        }
    }
}

impl ProfileDefaults {
    pub fn author(&self) -> String {
        self.author.clone().unwrap_or_else(login_user)
    }
}

/// Login name of the invoking user
pub fn login_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .ok()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "user".to_string())
}

fn identifier_token(raw: &str, fallback: &str) -> String {
    let token: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if token.is_empty() {
        fallback.to_string()
    } else {
        token
    }
}

/// Generate a three-component bundle identifier, e.g. `org.alan.MyApp`
pub fn bundle_identifier(prefix: &str, author: &str, name: &str) -> String {
    format!(
        "{}.{}.{}",
        identifier_token(prefix, DEFAULT_IDENTIFIER_PREFIX),
        identifier_token(author, "user"),
        identifier_token(name, "App")
    )
}

impl Profile {
    /// Profile populated with user-level defaults
    pub fn with_defaults(defaults: &ProfileDefaults) -> Self {
        let name = if defaults.app_name.is_empty() {
            default_app_name()
        } else {
            defaults.app_name.clone()
        };
        let author = defaults.author();
        let identifier = bundle_identifier(&defaults.identifier_prefix, &author, &name);

        Self {
            identifier,
            version: DEFAULT_VERSION.to_string(),
            author,

            interpreter_path: DEFAULT_INTERPRETER.to_string(),
            interpreter_args: Vec::new(),
            script_args: Vec::new(),
            script_path: None,
            app_path_as_first_arg: false,
            remain_running: true,
            authentication: false,
            run_in_background: false,

            interface_type: InterfaceType::TextWindow,
            droppable: false,
            accepts_files: false,
            accepts_text: false,
            prompt_for_file_on_launch: false,
            status_item_display_type: StatusItemDisplayType::Text,
            status_item_title: name.clone(),
            status_item_icon: None,
            status_item_use_system_font: false,
            text_foreground: DEFAULT_TEXT_FOREGROUND.to_string(),
            text_background: DEFAULT_TEXT_BACKGROUND.to_string(),
            text_font: DEFAULT_TEXT_FONT.to_string(),

            icon_path: None,
            doc_icon_path: None,
            bundled_files: Vec::new(),
            suffixes: Vec::new(),
            uniform_types: Vec::new(),
            uri_schemes: Vec::new(),

            overwrite: false,
            use_xml_plist_format: false,
            development_version: false,
            optimize_application: false,
            declare_service: false,

            name,
        }
    }

    /// Regenerate the bundle identifier from the current name and author
    pub fn derive_identifier(&mut self, prefix: &str) {
        self.identifier = bundle_identifier(prefix, &self.author, &self.name);
    }
}

impl Default for Profile {
    fn default() -> Self {
        Profile::with_defaults(&ProfileDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_sanity() {
        let profile = Profile::default();
        assert_eq!(profile.version, "1.0");
        assert_eq!(profile.interpreter_path, "/bin/sh");
        assert_eq!(profile.interface_type, InterfaceType::TextWindow);
        assert!(profile.bundled_files.is_empty());
        assert!(!profile.authentication);
        assert!(profile.remain_running);
        assert!(!profile.name.is_empty());
        assert_eq!(profile.identifier.split('.').count(), 3);
    }

    #[test]
    fn test_bundle_identifier_strips_non_word_characters() {
        assert_eq!(
            bundle_identifier("org", "Alan Smithee", "My App!"),
            "org.AlanSmithee.MyApp"
        );
        assert_eq!(bundle_identifier("", "", ""), "org.user.App");
    }

    #[test]
    fn test_with_defaults_uses_configured_values() {
        let defaults = ProfileDefaults {
            app_name: "Tool".to_string(),
            author: Some("jo".to_string()),
            identifier_prefix: "com".to_string(),
        };
        let profile = Profile::with_defaults(&defaults);
        assert_eq!(profile.name, "Tool");
        assert_eq!(profile.author, "jo");
        assert_eq!(profile.identifier, "com.jo.Tool");
        assert_eq!(profile.status_item_title, "Tool");
    }
}
