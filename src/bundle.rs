//! Bundle Materializer
//!
//! Turns a validated profile plus a script into an on-disk application bundle:
//!
//! ```text
//! <Name>.app/
//!   Contents/
//!     Info.plist
//!     MacOS/<Name>                 launcher runtime (executable)
//!     Resources/
//!       AppIcon.icns
//!       AppSettings.plist          runtime profile subset
//!       MainMenu.nib               interface template
//!       script                     wrapped script (executable)
//! ```
//!
//! Bundles are assembled in a staging directory next to the destination and moved
//! into place only once complete.

mod files;
mod icon;
mod info_plist;
mod materialize;
mod resources;
mod staging;

pub use icon::{icns_from_png, install_icon};
pub use info_plist::info_dictionary;
pub use materialize::Materializer;
pub use resources::{ResourceSource, SharedResources, LAUNCHER_BIN_NAME};
pub use staging::Staging;

use std::path::{Path, PathBuf};

pub const CONTENTS_DIR: &str = "Contents";
pub const MACOS_DIR: &str = "MacOS";
pub const RESOURCES_DIR: &str = "Resources";
pub const INFO_PLIST: &str = "Info.plist";
pub const APP_SETTINGS_PLIST: &str = "AppSettings.plist";
pub const SCRIPT_FILE: &str = "script";
pub const APP_ICON_FILE: &str = "AppIcon.icns";
pub const DOC_ICON_FILE: &str = "docIcon.icns";
pub const STATUS_ITEM_ICON_FILE: &str = "StatusItemIcon.icns";
pub const INTERFACE_TEMPLATE_FILE: &str = "MainMenu.nib";

/// Fixed paths inside a bundle rooted at `root`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleLayout {
    root: PathBuf,
}

impl BundleLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout of the bundle containing a launcher executable at `Contents/MacOS/<Name>`
    pub fn from_executable(executable: &Path) -> Option<Self> {
        let macos = executable.parent()?;
        let contents = macos.parent()?;
        if macos.file_name()? != MACOS_DIR || contents.file_name()? != CONTENTS_DIR {
            return None;
        }
        contents.parent().map(BundleLayout::new)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contents(&self) -> PathBuf {
        self.root.join(CONTENTS_DIR)
    }

    pub fn macos(&self) -> PathBuf {
        self.contents().join(MACOS_DIR)
    }

    pub fn resources(&self) -> PathBuf {
        self.contents().join(RESOURCES_DIR)
    }

    pub fn info_plist(&self) -> PathBuf {
        self.contents().join(INFO_PLIST)
    }

    pub fn app_settings(&self) -> PathBuf {
        self.resources().join(APP_SETTINGS_PLIST)
    }

    pub fn script(&self) -> PathBuf {
        self.resources().join(SCRIPT_FILE)
    }

    pub fn executable(&self, name: &str) -> PathBuf {
        self.macos().join(name)
    }
}

/// A materialized bundle
#[derive(Debug, Clone)]
pub struct Bundle {
    /// Bundle root (the `.app` directory)
    pub root: PathBuf,
    /// Launcher executable inside the bundle
    pub executable: PathBuf,
    /// Every created entry, relative to the root, in creation order
    pub entries: Vec<PathBuf>,
}

impl Bundle {
    pub fn layout(&self) -> BundleLayout {
        BundleLayout::new(&self.root)
    }
}
