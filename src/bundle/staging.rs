//! Staging area: build next to the destination, then move into place.
//!
//! The staging directory lives in the destination's parent so the final moves are
//! same-filesystem renames. Dropping an uncommitted `Staging` removes everything
//! built so far; the destination is never touched before `commit`.

use crate::error::BundleError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

const BUNDLE_DIR: &str = "bundle";
const PREVIOUS_DIR: &str = "previous";

pub struct Staging {
    dir: TempDir,
    destination: PathBuf,
}

impl Staging {
    /// Create a staging directory for `destination`
    pub fn new(destination: &Path) -> Result<Self, BundleError> {
        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let stem = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bundle".to_string());

        let dir = tempfile::Builder::new()
            .prefix(&format!(".{}.staging-", stem))
            .tempdir_in(&parent)
            .map_err(|e| {
                BundleError::io(format!("Failed to create staging directory in {:?}", parent), e)
            })?;
        debug!(staging = %dir.path().display(), "Created staging directory");

        Ok(Self {
            dir,
            destination: destination.to_path_buf(),
        })
    }

    /// Root of the bundle being built
    pub fn root(&self) -> PathBuf {
        self.dir.path().join(BUNDLE_DIR)
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Move the staged bundle to the destination.
    ///
    /// An existing destination is only replaced when `replace_existing` is set; the
    /// previous tree is moved aside first and restored if the final rename fails.
    pub fn commit(self, replace_existing: bool) -> Result<PathBuf, BundleError> {
        let staged = self.root();
        let previous = self.dir.path().join(PREVIOUS_DIR);
        let existed = self.destination.symlink_metadata().is_ok();

        if existed {
            if !replace_existing {
                return Err(BundleError::AlreadyExists(self.destination.clone()));
            }
            fs::rename(&self.destination, &previous).map_err(|e| {
                BundleError::io(
                    format!("Failed to move existing {:?} aside", self.destination),
                    e,
                )
            })?;
        }

        if let Err(e) = fs::rename(&staged, &self.destination) {
            if existed {
                if let Err(restore) = fs::rename(&previous, &self.destination) {
                    warn!(
                        destination = %self.destination.display(),
                        error = %restore,
                        "Failed to restore previous bundle"
                    );
                }
            }
            return Err(BundleError::io(
                format!("Failed to move bundle into place at {:?}", self.destination),
                e,
            ));
        }

        debug!(destination = %self.destination.display(), replaced = existed, "Committed bundle");
        // the TempDir drop removes the previous tree
        Ok(self.destination)
    }
}
