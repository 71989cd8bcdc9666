//! Configuration System
//!
//! Layered tool configuration: built-in defaults, the user's global config file, an
//! explicit `--config` file, then `PLATYPUS__SECTION__KEY` environment overrides.

use crate::logging::LoggingConfig;
use crate::profile::ProfileDefaults;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatypusConfig {
    /// Profile defaults applied before options are parsed
    #[serde(default)]
    pub defaults: ProfileDefaults,

    /// Where the launcher binary and shared bundle resources live
    #[serde(default)]
    pub resources: ResourceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Shared resources consumed by the bundle materializer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Directory holding ScriptExec, MainMenu.nib and PlatypusDefault.icns
    #[serde(default = "default_share_dir")]
    pub share_dir: PathBuf,

    /// Explicit launcher binary; overrides the share directory copy
    #[serde(default)]
    pub launcher: Option<PathBuf>,

    /// Tool used by OptimizeApplication to strip the launcher copy
    #[serde(default = "default_strip_tool")]
    pub strip_tool: PathBuf,
}

fn default_share_dir() -> PathBuf {
    PathBuf::from("/usr/local/share/platypus")
}

fn default_strip_tool() -> PathBuf {
    PathBuf::from("/usr/bin/strip")
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            share_dir: default_share_dir(),
            launcher: None,
            strip_tool: default_strip_tool(),
        }
    }
}

impl PlatypusConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.defaults.app_name.trim().is_empty() {
            errors.push("defaults.app_name cannot be empty".to_string());
        }
        if self.defaults.identifier_prefix.trim().is_empty() {
            errors.push("defaults.identifier_prefix cannot be empty".to_string());
        }
        if self.resources.share_dir.as_os_str().is_empty() {
            errors.push("resources.share_dir cannot be empty".to_string());
        }
        if let Some(launcher) = &self.resources.launcher {
            if !launcher.is_absolute() {
                errors.push(format!(
                    "resources.launcher must be an absolute path, got {}",
                    launcher.display()
                ));
            }
        }
        if !["text", "json"].contains(&self.logging.format.as_str()) {
            errors.push(format!("logging.format must be text or json, got {}", self.logging.format));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
