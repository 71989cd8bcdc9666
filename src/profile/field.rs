//! Profile field table
//!
//! Every configurable profile field is listed exactly once here with its property-list
//! key, value kind, and group. The option parser, the profile emitter, the profile
//! loader, and the AppSettings writer all key off this table.

use crate::error::ProfileError;

/// How a raw string value is coerced into a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Text,
    Path,
    List,
}

/// Logical grouping of profile fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Identity,
    Execution,
    Interface,
    Resources,
    Packaging,
}

/// A profile field, addressable by its property-list key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Identifier,
    Version,
    Author,
    InterpreterPath,
    InterpreterArgs,
    ScriptArgs,
    ScriptPath,
    AppPathAsFirstArg,
    RemainRunning,
    Authentication,
    RunInBackground,
    InterfaceType,
    Droppable,
    AcceptsFiles,
    AcceptsText,
    PromptForFileOnLaunch,
    StatusItemDisplayType,
    StatusItemTitle,
    StatusItemIcon,
    StatusItemUseSystemFont,
    TextForeground,
    TextBackground,
    TextFont,
    IconPath,
    DocIconPath,
    BundledFiles,
    Suffixes,
    UniformTypes,
    URISchemes,
    Overwrite,
    UseXMLPlistFormat,
    DevelopmentVersion,
    OptimizeApplication,
    DeclareService,
}

impl Field {
    /// All fields in emission order
    pub const ALL: &'static [Field] = &[
        Field::Name,
        Field::Identifier,
        Field::Version,
        Field::Author,
        Field::InterpreterPath,
        Field::InterpreterArgs,
        Field::ScriptArgs,
        Field::ScriptPath,
        Field::AppPathAsFirstArg,
        Field::RemainRunning,
        Field::Authentication,
        Field::RunInBackground,
        Field::InterfaceType,
        Field::Droppable,
        Field::AcceptsFiles,
        Field::AcceptsText,
        Field::PromptForFileOnLaunch,
        Field::StatusItemDisplayType,
        Field::StatusItemTitle,
        Field::StatusItemIcon,
        Field::StatusItemUseSystemFont,
        Field::TextForeground,
        Field::TextBackground,
        Field::TextFont,
        Field::IconPath,
        Field::DocIconPath,
        Field::BundledFiles,
        Field::Suffixes,
        Field::UniformTypes,
        Field::URISchemes,
        Field::Overwrite,
        Field::UseXMLPlistFormat,
        Field::DevelopmentVersion,
        Field::OptimizeApplication,
        Field::DeclareService,
    ];

    /// Property-list key, value kind, and group
    fn descriptor(self) -> (&'static str, ValueKind, FieldGroup) {
        use FieldGroup::*;
        use ValueKind::*;
        match self {
            Field::Name => ("Name", Text, Identity),
            Field::Identifier => ("Identifier", Text, Identity),
            Field::Version => ("Version", Text, Identity),
            Field::Author => ("Author", Text, Identity),
            Field::InterpreterPath => ("InterpreterPath", Text, Execution),
            Field::InterpreterArgs => ("InterpreterArgs", List, Execution),
            Field::ScriptArgs => ("ScriptArgs", List, Execution),
            Field::ScriptPath => ("ScriptPath", Path, Execution),
            Field::AppPathAsFirstArg => ("AppPathAsFirstArg", Bool, Execution),
            Field::RemainRunning => ("RemainRunning", Bool, Execution),
            Field::Authentication => ("Authentication", Bool, Execution),
            Field::RunInBackground => ("RunInBackground", Bool, Execution),
            Field::InterfaceType => ("InterfaceType", Text, Interface),
            Field::Droppable => ("Droppable", Bool, Interface),
            Field::AcceptsFiles => ("AcceptsFiles", Bool, Interface),
            Field::AcceptsText => ("AcceptsText", Bool, Interface),
            Field::PromptForFileOnLaunch => ("PromptForFileOnLaunch", Bool, Interface),
            Field::StatusItemDisplayType => ("StatusItemDisplayType", Text, Interface),
            Field::StatusItemTitle => ("StatusItemTitle", Text, Interface),
            Field::StatusItemIcon => ("StatusItemIcon", Path, Interface),
            Field::StatusItemUseSystemFont => ("StatusItemUseSystemFont", Bool, Interface),
            Field::TextForeground => ("TextForeground", Text, Interface),
            Field::TextBackground => ("TextBackground", Text, Interface),
            Field::TextFont => ("TextFont", Text, Interface),
            Field::IconPath => ("IconPath", Path, Resources),
            Field::DocIconPath => ("DocIconPath", Path, Resources),
            Field::BundledFiles => ("BundledFiles", List, Resources),
            Field::Suffixes => ("Suffixes", List, Resources),
            Field::UniformTypes => ("UniformTypes", List, Resources),
            Field::URISchemes => ("URISchemes", List, Resources),
            Field::Overwrite => ("Overwrite", Bool, Packaging),
            Field::UseXMLPlistFormat => ("UseXMLPlistFormat", Bool, Packaging),
            Field::DevelopmentVersion => ("DevelopmentVersion", Bool, Packaging),
            Field::OptimizeApplication => ("OptimizeApplication", Bool, Packaging),
            Field::DeclareService => ("DeclareService", Bool, Packaging),
        }
    }

    /// Property-list key
    pub fn key(self) -> &'static str {
        self.descriptor().0
    }

    pub fn kind(self) -> ValueKind {
        self.descriptor().1
    }

    pub fn group(self) -> FieldGroup {
        self.descriptor().2
    }
}

impl Field {
    /// Look up a field by its property-list key
    pub fn from_key(key: &str) -> Result<Field, ProfileError> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.key() == key)
            .ok_or_else(|| ProfileError::UnknownOption(key.to_string()))
    }

    /// Whether the launcher runtime needs this field in AppSettings.plist.
    ///
    /// Execution, Interface and Packaging groups, plus the name (window titles) and the
    /// drop filters. The script path is build-machine only; the launcher runs the
    /// bundled copy.
    pub fn is_runtime(self) -> bool {
        match self.group() {
            FieldGroup::Execution => self != Field::ScriptPath,
            FieldGroup::Interface | FieldGroup::Packaging => true,
            FieldGroup::Identity => self == Field::Name,
            FieldGroup::Resources => matches!(self, Field::Suffixes | Field::UniformTypes),
        }
    }

    /// Multi-valued fields with set semantics (duplicates dropped, first-seen order kept)
    pub fn is_set_like(self) -> bool {
        matches!(
            self,
            Field::BundledFiles | Field::Suffixes | Field::UniformTypes | Field::URISchemes
        )
    }
}
