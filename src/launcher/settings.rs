//! AppSettings.plist as read by the launcher

use crate::error::LauncherError;
use crate::profile::{InterfaceType, StatusItemDisplayType, DEFAULT_APP_NAME};
use serde::{Deserialize, Deserializer};
use std::path::Path;

fn interface_type<'de, D: Deserializer<'de>>(d: D) -> Result<InterfaceType, D::Error> {
    let raw = String::deserialize(d)?;
    raw.parse()
        .map_err(|_| serde::de::Error::custom(format!("unknown interface type {:?}", raw)))
}

fn status_item_display_type<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<StatusItemDisplayType, D::Error> {
    let raw = String::deserialize(d)?;
    raw.parse()
        .map_err(|_| serde::de::Error::custom(format!("unknown status item type {:?}", raw)))
}

fn default_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_true() -> bool {
    true
}

/// Runtime settings persisted in a bundle.
///
/// Keys match the profile's property-list keys. `InterpreterPath` is required;
/// everything else falls back to the profile defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(rename = "Name", default = "default_name")]
    pub name: String,

    #[serde(rename = "InterpreterPath")]
    pub interpreter_path: String,
    #[serde(rename = "InterpreterArgs", default)]
    pub interpreter_args: Vec<String>,
    #[serde(rename = "ScriptArgs", default)]
    pub script_args: Vec<String>,
    #[serde(rename = "AppPathAsFirstArg", default)]
    pub app_path_as_first_arg: bool,
    #[serde(rename = "RemainRunning", default = "default_true")]
    pub remain_running: bool,
    #[serde(rename = "Authentication", default)]
    pub authentication: bool,
    #[serde(rename = "RunInBackground", default)]
    pub run_in_background: bool,

    #[serde(
        rename = "InterfaceType",
        default,
        deserialize_with = "interface_type"
    )]
    pub interface_type: InterfaceType,
    #[serde(rename = "Droppable", default)]
    pub droppable: bool,
    #[serde(rename = "AcceptsFiles", default)]
    pub accepts_files: bool,
    #[serde(rename = "AcceptsText", default)]
    pub accepts_text: bool,
    #[serde(rename = "PromptForFileOnLaunch", default)]
    pub prompt_for_file_on_launch: bool,
    #[serde(
        rename = "StatusItemDisplayType",
        default,
        deserialize_with = "status_item_display_type"
    )]
    pub status_item_display_type: StatusItemDisplayType,
    #[serde(rename = "StatusItemTitle", default)]
    pub status_item_title: String,
    #[serde(rename = "TextFont", default)]
    pub text_font: String,
    #[serde(rename = "TextForeground", default)]
    pub text_foreground: String,
    #[serde(rename = "TextBackground", default)]
    pub text_background: String,

    #[serde(rename = "Suffixes", default)]
    pub suffixes: Vec<String>,
    #[serde(rename = "UniformTypes", default)]
    pub uniform_types: Vec<String>,
}

impl AppSettings {
    /// Load settings from a binary or XML property list
    pub fn load(path: &Path) -> Result<Self, LauncherError> {
        if !path.is_file() {
            return Err(LauncherError::ConfigLoad(format!(
                "{} does not exist",
                path.display()
            )));
        }
        plist::from_file(path)
            .map_err(|e| LauncherError::ConfigLoad(format!("{}: {}", path.display(), e)))
    }

    /// Whether dropped files are accepted
    pub fn accepts_files(&self) -> bool {
        self.droppable || self.accepts_files
    }

    /// Title for the status item, falling back to the app name
    pub fn status_title(&self) -> &str {
        if self.status_item_title.is_empty() {
            &self.name
        } else {
            &self.status_item_title
        }
    }
}
