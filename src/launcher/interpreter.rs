//! Interpreter resolution and argument vector assembly

use super::auth::Grant;
use super::settings::AppSettings;
use crate::bundle::BundleLayout;
use crate::error::LauncherError;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Resolve the configured interpreter to an executable file.
///
/// Absolute paths must exist; bare names are searched on `PATH`.
pub fn resolve_interpreter(interpreter: &str) -> Result<PathBuf, LauncherError> {
    let candidate = Path::new(interpreter);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(LauncherError::InterpreterNotFound(candidate.to_path_buf()))
        };
    }

    std::env::var_os("PATH")
        .and_then(|paths| {
            std::env::split_paths(&paths)
                .map(|dir| dir.join(interpreter))
                .find(|p| is_executable(p))
        })
        .ok_or_else(|| LauncherError::InterpreterNotFound(candidate.to_path_buf()))
}

/// The fixed part of every invocation: interpreter, its arguments, the bundled
/// script, the bundle path when it is passed along, and the configured script
/// arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    interpreter: PathBuf,
    interpreter_args: Vec<String>,
    script: PathBuf,
    app_path: Option<PathBuf>,
    script_args: Vec<String>,
}

impl Invocation {
    pub fn new(settings: &AppSettings, interpreter: PathBuf, layout: &BundleLayout) -> Self {
        Self {
            interpreter,
            interpreter_args: settings.interpreter_args.clone(),
            script: layout.script(),
            app_path: settings
                .app_path_as_first_arg
                .then(|| layout.root().to_path_buf()),
            script_args: settings.script_args.clone(),
        }
    }

    /// `[interpreter] ++ interpreter_args ++ [script] ++ [app]? ++ script_args ++ forwarded`,
    /// prefixed by the privilege wrapper when elevated
    pub fn argv(&self, grant: Grant, forwarded: &[String]) -> Vec<String> {
        let mut argv: Vec<String> = grant.command_prefix().iter().map(|s| s.to_string()).collect();
        argv.push(self.interpreter.to_string_lossy().into_owned());
        argv.extend(self.interpreter_args.iter().cloned());
        argv.push(self.script.to_string_lossy().into_owned());
        if let Some(app) = &self.app_path {
            argv.push(app.to_string_lossy().into_owned());
        }
        argv.extend(self.script_args.iter().cloned());
        argv.extend(forwarded.iter().cloned());
        argv
    }
}
