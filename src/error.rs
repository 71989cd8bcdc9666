//! Error types for the profile compiler and the launcher runtime.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A single failed validation rule, identified by the profile field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Option parsing and profile validation errors
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Option {0} requires an argument")]
    MissingArgument(String),

    #[error("Invalid value {value:?} for {field}: expected {expected}")]
    TypeMismatch {
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("Profile validation failed:\n{}", format_violations(.0))]
    Validation(Vec<Violation>),

    #[error("Failed to load profile {path:?}: {reason}")]
    ProfileLoad { path: PathBuf, reason: String },

    #[error("Failed to write profile: {0}")]
    Emit(String),
}

/// Bundle materialization errors. Any of these leaves the destination untouched.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Destination already exists: {0:?} (use --overwrite to replace it)")]
    AlreadyExists(PathBuf),

    #[error("Cannot convert icon {path:?}: {reason}")]
    IconConversion { path: PathBuf, reason: String },

    #[error("Bundled file name collision: {0}")]
    NameCollision(String),

    #[error("Missing resource: {0}")]
    MissingResource(String),

    #[error("Property list error: {0}")]
    Plist(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl BundleError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        BundleError::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<plist::Error> for BundleError {
    fn from(err: plist::Error) -> Self {
        BundleError::Plist(err.to_string())
    }
}

/// Launcher runtime errors. None of these leave a child process behind.
#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("Unable to load application settings: {0}")]
    ConfigLoad(String),

    #[error("Permission denied: administrator privileges were not granted")]
    PermissionDenied,

    #[error("Interpreter not found: {0:?}")]
    InterpreterNotFound(PathBuf),

    #[error("Failed to start script: {0}")]
    Spawn(String),

    #[error("Invalid launcher transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },

    #[error("Launcher I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error surfaced by the command line tools
#[derive(Debug, Error)]
pub enum PlatypusError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error(transparent)]
    Launcher(#[from] LauncherError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for PlatypusError {
    fn from(err: config::ConfigError) -> Self {
        PlatypusError::Config(err.to_string())
    }
}

impl PlatypusError {
    /// Process exit code for this error. Usage errors exit 2, everything else 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            PlatypusError::Profile(ProfileError::UnknownOption(_))
            | PlatypusError::Profile(ProfileError::MissingArgument(_)) => 2,
            _ => 1,
        }
    }
}
