//! Replacing an existing destination

use super::test_utils::{platypus_cmd, write_script};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Every entry under `root` with its contents, for byte-for-byte comparison
fn snapshot(root: &Path) -> Vec<(String, Option<Vec<u8>>)> {
    let mut entries: Vec<_> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .map(|e| {
            let entry = e.unwrap();
            let contents = entry
                .file_type()
                .is_file()
                .then(|| fs::read(entry.path()).unwrap());
            (entry.path().display().to_string(), contents)
        })
        .collect();
    entries.sort();
    entries
}

#[test]
fn test_existing_destination_is_untouched_without_overwrite() {
    let temp = TempDir::new().unwrap();
    let destination = temp.path().join("MyApp.app");
    fs::create_dir_all(destination.join("Contents")).unwrap();
    fs::write(destination.join("Contents/marker"), "keep me").unwrap();
    let before = snapshot(&destination);

    let script = write_script(temp.path(), "script.sh", "echo hi\n");
    let output = platypus_cmd(&temp)
        .args(["-a", "MyApp"])
        .arg(&script)
        .arg(&destination)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
    assert_eq!(snapshot(&destination), before);
}

#[test]
fn test_overwrite_replaces_whole_tree() {
    let temp = TempDir::new().unwrap();
    let destination = temp.path().join("MyApp.app");
    fs::create_dir_all(destination.join("Contents")).unwrap();
    fs::write(destination.join("Contents/marker"), "stale").unwrap();

    let script = write_script(temp.path(), "script.sh", "echo hi\n");
    let output = platypus_cmd(&temp)
        .args(["-y", "-a", "MyApp"])
        .arg(&script)
        .arg(&destination)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(!destination.join("Contents/marker").exists());
    assert!(destination.join("Contents/MacOS/MyApp").is_file());
}
