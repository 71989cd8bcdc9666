//! Job requests and the arguments they forward to the script

use super::settings::AppSettings;
use std::path::{Path, PathBuf};

/// Prefix of the process serial number argument macOS adds to GUI launches
const PSN_PREFIX: &str = "-psn_";
/// Suffix-list entry that admits dropped folders
const FOLDER_SUFFIX: &str = "fold";
const ANY_SUFFIX: &str = "*";
const ANY_ITEM_TYPE: &str = "public.item";
const ANY_DATA_TYPE: &str = "public.data";
const FOLDER_TYPE: &str = "public.folder";

/// A unit of work for the launcher: one script invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRequest {
    /// Arguments delivered at launch (or a re-open of the app)
    Launch(Vec<String>),
    /// Files dropped on the app, in drop order
    DropFiles(Vec<PathBuf>),
    /// Text dropped on the app
    DropText(String),
}

/// Launch arguments without OS-injected process serial numbers
pub fn launch_arguments<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    args.into_iter()
        .map(Into::into)
        .filter(|arg| !arg.starts_with(PSN_PREFIX))
        .collect()
}

/// Which dropped items the app accepts
#[derive(Debug, Clone)]
pub struct DropFilter {
    accepts_files: bool,
    accepts_text: bool,
    suffixes: Vec<String>,
    uniform_types: Vec<String>,
}

impl DropFilter {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            accepts_files: settings.accepts_files(),
            accepts_text: settings.accepts_text,
            suffixes: settings.suffixes.iter().map(|s| s.to_lowercase()).collect(),
            uniform_types: settings.uniform_types.clone(),
        }
    }

    fn accepts_anything(&self) -> bool {
        (self.suffixes.is_empty() && self.uniform_types.is_empty())
            || self.suffixes.iter().any(|s| s == ANY_SUFFIX)
            || self.uniform_types.iter().any(|t| t == ANY_ITEM_TYPE)
    }

    /// Whether a single dropped path is acceptable
    pub fn accepts_path(&self, path: &Path) -> bool {
        if !self.accepts_files {
            return false;
        }
        if self.accepts_anything() {
            return true;
        }
        if path.is_dir() {
            return self.suffixes.iter().any(|s| s == FOLDER_SUFFIX)
                || self.uniform_types.iter().any(|t| t == FOLDER_TYPE);
        }
        if self.uniform_types.iter().any(|t| t == ANY_DATA_TYPE) {
            return true;
        }
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .map(|ext| self.suffixes.iter().any(|s| *s == ext))
            .unwrap_or(false)
    }

    pub fn accepts_text(&self) -> bool {
        self.accepts_text
    }
}

impl JobRequest {
    /// Arguments forwarded to the script, in the order received.
    ///
    /// Unacceptable dropped files are skipped; `None` when nothing is left to run.
    pub fn forwarded_args(&self, filter: &DropFilter) -> Option<Vec<String>> {
        match self {
            JobRequest::Launch(args) => Some(args.clone()),
            JobRequest::DropFiles(paths) => {
                let accepted: Vec<String> = paths
                    .iter()
                    .filter(|p| filter.accepts_path(p))
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect();
                if accepted.is_empty() {
                    None
                } else {
                    Some(accepted)
                }
            }
            JobRequest::DropText(text) => filter.accepts_text().then(|| vec![text.clone()]),
        }
    }
}
