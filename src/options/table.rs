//! Static option-descriptor table: flag token → profile field(s).

use crate::profile::{Field, ValueKind};

/// What a flag does to its target fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionAction {
    /// Boolean switch setting every target field to true
    SetTrue,
    /// Inverse boolean switch setting its target field to false
    SetFalse,
    /// Takes one argument, coerced according to the field's value kind
    Value,
}

/// One command line option bound to profile fields
#[derive(Debug)]
pub struct OptionDescriptor {
    pub short: char,
    pub long: &'static str,
    pub fields: &'static [Field],
    pub action: OptionAction,
    pub help: &'static str,
}

impl OptionDescriptor {
    /// Value kind of the option's argument, if it takes one
    pub fn value_kind(&self) -> Option<ValueKind> {
        match self.action {
            OptionAction::Value => self.fields.first().map(|f| f.kind()),
            OptionAction::SetTrue | OptionAction::SetFalse => None,
        }
    }

    pub fn value_name(&self) -> &'static str {
        match self.value_kind() {
            Some(ValueKind::List) => "ITEM|ITEM",
            Some(ValueKind::Path) => "PATH",
            _ => "VALUE",
        }
    }
}

const fn switch(short: char, long: &'static str, fields: &'static [Field], help: &'static str) -> OptionDescriptor {
    OptionDescriptor {
        short,
        long,
        fields,
        action: OptionAction::SetTrue,
        help,
    }
}

const fn value(short: char, long: &'static str, fields: &'static [Field], help: &'static str) -> OptionDescriptor {
    OptionDescriptor {
        short,
        long,
        fields,
        action: OptionAction::Value,
        help,
    }
}

/// Every profile option accepted on the command line
pub const PROFILE_OPTIONS: &[OptionDescriptor] = &[
    // Switches
    switch('A', "admin-privileges", &[Field::Authentication], "Request administrator privileges before running the script"),
    switch('D', "droppable", &[Field::Droppable, Field::AcceptsFiles], "Accept dropped files as script arguments"),
    switch('F', "text-droppable", &[Field::AcceptsText], "Accept dropped text"),
    switch('N', "service", &[Field::DeclareService], "Register the app as a text/file service"),
    switch('B', "background", &[Field::RunInBackground], "Run in the background without a Dock icon"),
    OptionDescriptor {
        short: 'R',
        long: "quit-after-execution",
        fields: &[Field::RemainRunning],
        action: OptionAction::SetFalse,
        help: "Quit the app as soon as the script exits",
    },
    switch('E', "app-path-as-first-argument", &[Field::AppPathAsFirstArg], "Pass the application bundle path to the script as its first argument"),
    switch('Z', "file-prompt", &[Field::PromptForFileOnLaunch], "Prompt for files when launched without arguments"),
    switch('c', "status-item-sysfont", &[Field::StatusItemUseSystemFont], "Use the system font for the status item menu"),
    switch('x', "xml-property-lists", &[Field::UseXMLPlistFormat], "Write property lists in XML instead of binary"),
    switch('d', "development-version", &[Field::DevelopmentVersion], "Symlink the script and launcher instead of copying"),
    switch('l', "optimize", &[Field::OptimizeApplication], "Strip non-essential metadata from the launcher copy"),
    switch('y', "overwrite", &[Field::Overwrite], "Replace an existing bundle at the destination"),
    // Strings
    value('a', "name", &[Field::Name], "Application name"),
    value('o', "interface-type", &[Field::InterfaceType], "Text Window, Progress Bar, Status Menu, Droppable, Web View or None"),
    value('p', "interpreter", &[Field::InterpreterPath], "Interpreter used to run the script"),
    value('V', "app-version", &[Field::Version], "Application version"),
    value('u', "author", &[Field::Author], "Author name"),
    value('I', "bundle-identifier", &[Field::Identifier], "Bundle identifier (e.g. org.example.MyApp)"),
    value('b', "text-background-color", &[Field::TextBackground], "Text window background colour (#rrggbb)"),
    value('g', "text-foreground-color", &[Field::TextForeground], "Text window foreground colour (#rrggbb)"),
    value('n', "text-font", &[Field::TextFont], "Text window font (e.g. 'Monaco 13')"),
    value('K', "status-item-kind", &[Field::StatusItemDisplayType], "Status item display type: Icon or Text"),
    value('Y', "status-item-title", &[Field::StatusItemTitle], "Status item title"),
    // Paths
    value('i', "app-icon", &[Field::IconPath], "Application icon (.icns or square .png)"),
    value('Q', "document-icon", &[Field::DocIconPath], "Document icon"),
    value('L', "status-item-icon", &[Field::StatusItemIcon], "Status item icon"),
    // Lists
    value('G', "interpreter-args", &[Field::InterpreterArgs], "Arguments passed to the interpreter"),
    value('C', "script-args", &[Field::ScriptArgs], "Arguments passed to the script"),
    value('f', "bundled-file", &[Field::BundledFiles], "Absolute paths of files to bundle"),
    value('X', "suffixes", &[Field::Suffixes], "Accepted file suffixes for dropped files"),
    value('T', "uniform-type-identifiers", &[Field::UniformTypes], "Accepted uniform type identifiers"),
    value('U', "uri-schemes", &[Field::URISchemes], "URI schemes the app handles"),
];

/// Find the descriptor for a flag token such as `-a` or `--name`
pub fn descriptor_for_flag(token: &str) -> Option<&'static OptionDescriptor> {
    if let Some(long) = token.strip_prefix("--") {
        return PROFILE_OPTIONS.iter().find(|d| d.long == long);
    }
    let mut chars = token.strip_prefix('-')?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => PROFILE_OPTIONS.iter().find(|d| d.short == c),
        _ => None,
    }
}
