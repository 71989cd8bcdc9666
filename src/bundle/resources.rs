//! Shared resources copied into every bundle: the launcher runtime, the interface
//! template and the default icon.
//!
//! The template and icon are built in; a share directory may override either.

use super::files;
use crate::config::ResourceConfig;
use crate::error::BundleError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the launcher runtime binary installed next to `platypus`
pub const LAUNCHER_BIN_NAME: &str = "scriptexec";

const SHARED_LAUNCHER_NAME: &str = "ScriptExec";
const SHARED_TEMPLATE_NAME: &str = "MainMenu.nib";
const SHARED_ICON_NAME: &str = "PlatypusDefault.icns";

const BUILTIN_TEMPLATE: &[u8] = include_bytes!("../../resources/MainMenu.nib");
const BUILTIN_ICON: &[u8] = include_bytes!("../../resources/PlatypusDefault.icns");

/// Where a shared resource's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSource {
    File(PathBuf),
    Builtin(&'static [u8]),
}

impl ResourceSource {
    /// Install the resource at `dest`
    pub fn install(&self, dest: &Path) -> Result<(), BundleError> {
        match self {
            ResourceSource::File(path) => files::copy_file(path, dest),
            ResourceSource::Builtin(bytes) => files::write_file(dest, bytes),
        }
    }

    fn from_share_dir(share_dir: &Path, name: &str, builtin: &'static [u8]) -> Self {
        let candidate = share_dir.join(name);
        if candidate.is_file() {
            ResourceSource::File(candidate)
        } else {
            ResourceSource::Builtin(builtin)
        }
    }
}

#[derive(Debug, Clone)]
pub struct SharedResources {
    pub launcher: PathBuf,
    pub interface_template: ResourceSource,
    pub default_icon: ResourceSource,
    pub strip_tool: PathBuf,
}

impl SharedResources {
    /// Resolve resources from configuration.
    ///
    /// The launcher is searched in order: `resources.launcher`, the share directory,
    /// then next to the running executable.
    pub fn resolve(config: &ResourceConfig) -> Result<Self, BundleError> {
        let launcher = Self::find_launcher(config).ok_or_else(|| {
            BundleError::MissingResource(format!(
                "launcher runtime not found (set resources.launcher or install {} in {})",
                SHARED_LAUNCHER_NAME,
                config.share_dir.display()
            ))
        })?;
        debug!(launcher = %launcher.display(), "Resolved launcher runtime");

        Ok(Self {
            launcher,
            interface_template: ResourceSource::from_share_dir(
                &config.share_dir,
                SHARED_TEMPLATE_NAME,
                BUILTIN_TEMPLATE,
            ),
            default_icon: ResourceSource::from_share_dir(
                &config.share_dir,
                SHARED_ICON_NAME,
                BUILTIN_ICON,
            ),
            strip_tool: config.strip_tool.clone(),
        })
    }

    /// Built-in template and icon with an explicit launcher
    pub fn with_launcher(launcher: impl Into<PathBuf>) -> Self {
        Self {
            launcher: launcher.into(),
            interface_template: ResourceSource::Builtin(BUILTIN_TEMPLATE),
            default_icon: ResourceSource::Builtin(BUILTIN_ICON),
            strip_tool: ResourceConfig::default().strip_tool,
        }
    }

    fn find_launcher(config: &ResourceConfig) -> Option<PathBuf> {
        if let Some(explicit) = &config.launcher {
            return explicit.is_file().then(|| explicit.clone());
        }
        let shared = config.share_dir.join(SHARED_LAUNCHER_NAME);
        if shared.is_file() {
            return Some(shared);
        }
        let sibling = std::env::current_exe()
            .ok()?
            .parent()?
            .join(LAUNCHER_BIN_NAME);
        sibling.is_file().then_some(sibling)
    }
}
