//! Strongly-typed profile model and field access through the field table.

use crate::error::ProfileError;
use crate::profile::field::{Field, ValueKind};
use plist::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Delimiter for list-valued raw options. No escaping.
pub const LIST_DELIMITER: char = '|';

/// Visual presentation mode of a running app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterfaceType {
    #[default]
    TextWindow,
    ProgressBar,
    StatusMenu,
    Droppable,
    WebView,
    None,
}

impl InterfaceType {
    pub const ALL: &'static [InterfaceType] = &[
        InterfaceType::TextWindow,
        InterfaceType::ProgressBar,
        InterfaceType::StatusMenu,
        InterfaceType::Droppable,
        InterfaceType::WebView,
        InterfaceType::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InterfaceType::TextWindow => "Text Window",
            InterfaceType::ProgressBar => "Progress Bar",
            InterfaceType::StatusMenu => "Status Menu",
            InterfaceType::Droppable => "Droppable",
            InterfaceType::WebView => "Web View",
            InterfaceType::None => "None",
        }
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterfaceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "Droplet" is the older name for the droppable mode
        if s == "Droplet" {
            return Ok(InterfaceType::Droppable);
        }
        InterfaceType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

/// How the status menu item presents itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusItemDisplayType {
    Icon,
    #[default]
    Text,
}

impl StatusItemDisplayType {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusItemDisplayType::Icon => "Icon",
            StatusItemDisplayType::Text => "Text",
        }
    }
}

impl FromStr for StatusItemDisplayType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Icon" => Ok(StatusItemDisplayType::Icon),
            "Text" => Ok(StatusItemDisplayType::Text),
            _ => Err(()),
        }
    }
}

/// The canonical configuration describing how to build an application bundle
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    // Identity
    pub name: String,
    pub identifier: String,
    pub version: String,
    pub author: String,

    // Execution
    pub interpreter_path: String,
    pub interpreter_args: Vec<String>,
    pub script_args: Vec<String>,
    pub script_path: Option<PathBuf>,
    pub app_path_as_first_arg: bool,
    pub remain_running: bool,
    pub authentication: bool,
    pub run_in_background: bool,

    // Interface
    pub interface_type: InterfaceType,
    pub droppable: bool,
    pub accepts_files: bool,
    pub accepts_text: bool,
    pub prompt_for_file_on_launch: bool,
    pub status_item_display_type: StatusItemDisplayType,
    pub status_item_title: String,
    pub status_item_icon: Option<PathBuf>,
    pub status_item_use_system_font: bool,
    pub text_foreground: String,
    pub text_background: String,
    pub text_font: String,

    // Resources
    pub icon_path: Option<PathBuf>,
    pub doc_icon_path: Option<PathBuf>,
    pub bundled_files: Vec<PathBuf>,
    pub suffixes: Vec<String>,
    pub uniform_types: Vec<String>,
    pub uri_schemes: Vec<String>,

    // Packaging
    pub overwrite: bool,
    pub use_xml_plist_format: bool,
    pub development_version: bool,
    pub optimize_application: bool,
    pub declare_service: bool,
}

/// Split a raw list option on the delimiter. Empty items are kept, so `a||b` is
/// three items; an empty raw value is no items at all.
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(LIST_DELIMITER).map(str::to_string).collect()
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, value: T) {
    if !items.contains(&value) {
        items.push(value);
    }
}

fn parse_bool(field: Field, raw: &str) -> Result<bool, ProfileError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(mismatch(field, raw, "a boolean")),
    }
}

fn mismatch(field: Field, raw: &str, expected: &'static str) -> ProfileError {
    ProfileError::TypeMismatch {
        field: field.key().to_string(),
        value: raw.to_string(),
        expected,
    }
}

fn optional_path(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        None
    } else {
        Some(PathBuf::from(raw))
    }
}

impl Profile {
    /// Set a field by its key from a raw string value.
    ///
    /// Fails with `UnknownOption` for unrecognized keys and `TypeMismatch` when the raw
    /// value cannot be coerced to the field's type.
    pub fn set_option(&mut self, key: &str, raw: &str) -> Result<(), ProfileError> {
        let field = Field::from_key(key)?;
        self.set_field(field, raw)
    }

    /// Set a field from a raw string value. List fields append the split items.
    pub fn set_field(&mut self, field: Field, raw: &str) -> Result<(), ProfileError> {
        match field.kind() {
            ValueKind::Bool => {
                let value = parse_bool(field, raw)?;
                self.set_flag(field, value)
            }
            ValueKind::List => {
                let items = split_list(raw);
                // set-like lists hold names and paths, never blanks
                let keep_empty = !field.is_set_like();
                for item in items.into_iter().filter(|i| keep_empty || !i.is_empty()) {
                    self.push_item(field, item)?;
                }
                Ok(())
            }
            ValueKind::Text | ValueKind::Path => self.set_scalar(field, raw),
        }
    }

    /// Set a boolean field
    pub fn set_flag(&mut self, field: Field, value: bool) -> Result<(), ProfileError> {
        let slot = match field {
            Field::AppPathAsFirstArg => &mut self.app_path_as_first_arg,
            Field::RemainRunning => &mut self.remain_running,
            Field::Authentication => &mut self.authentication,
            Field::RunInBackground => &mut self.run_in_background,
            Field::Droppable => &mut self.droppable,
            Field::AcceptsFiles => &mut self.accepts_files,
            Field::AcceptsText => &mut self.accepts_text,
            Field::PromptForFileOnLaunch => &mut self.prompt_for_file_on_launch,
            Field::StatusItemUseSystemFont => &mut self.status_item_use_system_font,
            Field::Overwrite => &mut self.overwrite,
            Field::UseXMLPlistFormat => &mut self.use_xml_plist_format,
            Field::DevelopmentVersion => &mut self.development_version,
            Field::OptimizeApplication => &mut self.optimize_application,
            Field::DeclareService => &mut self.declare_service,
            other => return Err(mismatch(other, &value.to_string(), "a non-boolean value")),
        };
        *slot = value;
        Ok(())
    }

    fn set_scalar(&mut self, field: Field, raw: &str) -> Result<(), ProfileError> {
        match field {
            Field::Name => self.name = raw.to_string(),
            Field::Identifier => self.identifier = raw.to_string(),
            Field::Version => self.version = raw.to_string(),
            Field::Author => self.author = raw.to_string(),
            Field::InterpreterPath => self.interpreter_path = raw.to_string(),
            Field::ScriptPath => self.script_path = optional_path(raw),
            Field::InterfaceType => {
                self.interface_type = raw
                    .parse()
                    .map_err(|_| mismatch(field, raw, "an interface type"))?;
            }
            Field::StatusItemDisplayType => {
                self.status_item_display_type = raw
                    .parse()
                    .map_err(|_| mismatch(field, raw, "Icon or Text"))?;
            }
            Field::StatusItemTitle => self.status_item_title = raw.to_string(),
            Field::StatusItemIcon => self.status_item_icon = optional_path(raw),
            Field::TextForeground => self.text_foreground = raw.to_string(),
            Field::TextBackground => self.text_background = raw.to_string(),
            Field::TextFont => self.text_font = raw.to_string(),
            Field::IconPath => self.icon_path = optional_path(raw),
            Field::DocIconPath => self.doc_icon_path = optional_path(raw),
            other => return Err(mismatch(other, raw, "a list or boolean value")),
        }
        Ok(())
    }

    fn push_item(&mut self, field: Field, item: String) -> Result<(), ProfileError> {
        match field {
            Field::InterpreterArgs => self.interpreter_args.push(item),
            Field::ScriptArgs => self.script_args.push(item),
            Field::BundledFiles => push_unique(&mut self.bundled_files, PathBuf::from(item)),
            Field::Suffixes => push_unique(&mut self.suffixes, item),
            Field::UniformTypes => push_unique(&mut self.uniform_types, item),
            Field::URISchemes => push_unique(&mut self.uri_schemes, item),
            other => return Err(mismatch(other, &item, "a single value")),
        }
        Ok(())
    }

    fn list(&self, field: Field) -> Vec<String> {
        match field {
            Field::InterpreterArgs => self.interpreter_args.clone(),
            Field::ScriptArgs => self.script_args.clone(),
            Field::BundledFiles => self
                .bundled_files
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
            Field::Suffixes => self.suffixes.clone(),
            Field::UniformTypes => self.uniform_types.clone(),
            Field::URISchemes => self.uri_schemes.clone(),
            _ => Vec::new(),
        }
    }

    fn flag(&self, field: Field) -> bool {
        match field {
            Field::AppPathAsFirstArg => self.app_path_as_first_arg,
            Field::RemainRunning => self.remain_running,
            Field::Authentication => self.authentication,
            Field::RunInBackground => self.run_in_background,
            Field::Droppable => self.droppable,
            Field::AcceptsFiles => self.accepts_files,
            Field::AcceptsText => self.accepts_text,
            Field::PromptForFileOnLaunch => self.prompt_for_file_on_launch,
            Field::StatusItemUseSystemFont => self.status_item_use_system_font,
            Field::Overwrite => self.overwrite,
            Field::UseXMLPlistFormat => self.use_xml_plist_format,
            Field::DevelopmentVersion => self.development_version,
            Field::OptimizeApplication => self.optimize_application,
            Field::DeclareService => self.declare_service,
            _ => false,
        }
    }

    fn scalar(&self, field: Field) -> Option<String> {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.to_string_lossy().into_owned());
        match field {
            Field::Name => Some(self.name.clone()),
            Field::Identifier => Some(self.identifier.clone()),
            Field::Version => Some(self.version.clone()),
            Field::Author => Some(self.author.clone()),
            Field::InterpreterPath => Some(self.interpreter_path.clone()),
            Field::ScriptPath => path(&self.script_path),
            Field::InterfaceType => Some(self.interface_type.as_str().to_string()),
            Field::StatusItemDisplayType => Some(self.status_item_display_type.as_str().to_string()),
            Field::StatusItemTitle => Some(self.status_item_title.clone()),
            Field::StatusItemIcon => path(&self.status_item_icon),
            Field::TextForeground => Some(self.text_foreground.clone()),
            Field::TextBackground => Some(self.text_background.clone()),
            Field::TextFont => Some(self.text_font.clone()),
            Field::IconPath => path(&self.icon_path),
            Field::DocIconPath => path(&self.doc_icon_path),
            _ => None,
        }
    }

    /// Property-list value of a field. `None` for unset optional paths.
    pub fn value(&self, field: Field) -> Option<Value> {
        match field.kind() {
            ValueKind::Bool => Some(Value::Boolean(self.flag(field))),
            ValueKind::List => Some(Value::Array(
                self.list(field).into_iter().map(Value::String).collect(),
            )),
            ValueKind::Text | ValueKind::Path => self.scalar(field).map(Value::String),
        }
    }

    /// Replace a field from a property-list value (profile loading).
    ///
    /// Unlike `set_field`, list values replace rather than append.
    pub fn put_value(&mut self, field: Field, value: &Value) -> Result<(), ProfileError> {
        match (field.kind(), value) {
            (ValueKind::Bool, Value::Boolean(b)) => self.set_flag(field, *b),
            (ValueKind::List, Value::Array(items)) => {
                self.clear_list(field);
                for item in items {
                    let s = item
                        .as_string()
                        .ok_or_else(|| mismatch(field, &format!("{:?}", item), "a string item"))?;
                    self.push_item(field, s.to_string())?;
                }
                Ok(())
            }
            (ValueKind::Text | ValueKind::Path, Value::String(s)) => self.set_scalar(field, s),
            (kind, other) => Err(mismatch(
                field,
                &format!("{:?}", other),
                match kind {
                    ValueKind::Bool => "a boolean",
                    ValueKind::List => "an array",
                    ValueKind::Text | ValueKind::Path => "a string",
                },
            )),
        }
    }

    fn clear_list(&mut self, field: Field) {
        match field {
            Field::InterpreterArgs => self.interpreter_args.clear(),
            Field::ScriptArgs => self.script_args.clear(),
            Field::BundledFiles => self.bundled_files.clear(),
            Field::Suffixes => self.suffixes.clear(),
            Field::UniformTypes => self.uniform_types.clear(),
            Field::URISchemes => self.uri_schemes.clear(),
            _ => {}
        }
    }

    /// Whether the app accepts dropped items of any kind
    pub fn accepts_drops(&self) -> bool {
        self.droppable || self.accepts_files || self.accepts_text
    }
}
