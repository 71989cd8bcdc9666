//! Filesystem helpers for assembling bundle contents

use crate::error::BundleError;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Mode for executables inside the bundle
pub const EXECUTABLE_MODE: u32 = 0o755;

pub fn create_dir(path: &Path) -> Result<(), BundleError> {
    fs::create_dir_all(path)
        .map_err(|e| BundleError::io(format!("Failed to create directory {:?}", path), e))
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), BundleError> {
    fs::write(path, bytes).map_err(|e| BundleError::io(format!("Failed to write {:?}", path), e))
}

pub fn copy_file(source: &Path, dest: &Path) -> Result<(), BundleError> {
    fs::copy(source, dest)
        .map(|_| ())
        .map_err(|e| BundleError::io(format!("Failed to copy {:?} to {:?}", source, dest), e))
}

pub fn make_executable(path: &Path) -> Result<(), BundleError> {
    fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE))
        .map_err(|e| BundleError::io(format!("Failed to set permissions on {:?}", path), e))
}

/// Symlink `link` to the absolute form of `target`
pub fn symlink_to(target: &Path, link: &Path) -> Result<(), BundleError> {
    let target = dunce::canonicalize(target)
        .map_err(|e| BundleError::io(format!("Failed to resolve {:?}", target), e))?;
    std::os::unix::fs::symlink(&target, link)
        .map_err(|e| BundleError::io(format!("Failed to link {:?} to {:?}", link, target), e))
}

/// Copy a file or a whole directory tree to `dest`.
///
/// Returns the created entries relative to `dest`'s parent, in walk order. Symlinks
/// inside a copied tree are recreated rather than followed.
pub fn copy_tree(source: &Path, dest: &Path) -> Result<Vec<PathBuf>, BundleError> {
    let meta = fs::metadata(source)
        .map_err(|e| BundleError::io(format!("Failed to read {:?}", source), e))?;
    if !meta.is_dir() {
        copy_file(source, dest)?;
        fs::set_permissions(dest, meta.permissions())
            .map_err(|e| BundleError::io(format!("Failed to set permissions on {:?}", dest), e))?;
        return Ok(vec![dest.to_path_buf()]);
    }

    let mut created = Vec::new();
    for entry in WalkDir::new(source).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let context = format!("Failed to walk {:?}", source);
            match e.into_io_error() {
                Some(io) => BundleError::io(context, io),
                None => BundleError::MissingResource(context),
            }
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| BundleError::MissingResource(format!("{:?}", entry.path())))?;
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            create_dir(&target)?;
        } else if file_type.is_symlink() {
            let link = fs::read_link(entry.path())
                .map_err(|e| BundleError::io(format!("Failed to read link {:?}", entry.path()), e))?;
            std::os::unix::fs::symlink(&link, &target)
                .map_err(|e| BundleError::io(format!("Failed to create link {:?}", target), e))?;
        } else {
            copy_file(entry.path(), &target)?;
        }
        created.push(target);
    }
    Ok(created)
}
