//! Bundle structure produced by the `platypus` binary

use super::test_utils::{
    assert_success, create_app, platypus_cmd, read_plist, string_value, write_script,
};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

const SCRIPT: &str = "#!/bin/sh\necho hello\n";

fn relative_entries(root: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap().path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    entries.sort();
    entries
}

fn is_executable(path: &Path) -> bool {
    fs::metadata(path).unwrap().permissions().mode() & 0o111 != 0
}

#[test]
fn test_fresh_bundle_has_exactly_the_fixed_layout() {
    let temp = TempDir::new().unwrap();
    let app = create_app(&temp, "MyApp", SCRIPT, &[]);

    let expected: Vec<PathBuf> = [
        "",
        "Contents",
        "Contents/Info.plist",
        "Contents/MacOS",
        "Contents/MacOS/MyApp",
        "Contents/Resources",
        "Contents/Resources/AppIcon.icns",
        "Contents/Resources/AppSettings.plist",
        "Contents/Resources/MainMenu.nib",
        "Contents/Resources/script",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    assert_eq!(relative_entries(&app), expected);

    assert!(is_executable(&app.join("Contents/MacOS/MyApp")));
    assert!(is_executable(&app.join("Contents/Resources/script")));
    assert_eq!(
        fs::read_to_string(app.join("Contents/Resources/script")).unwrap(),
        SCRIPT
    );
}

#[test]
fn test_info_plist_identity() {
    let temp = TempDir::new().unwrap();
    let app = create_app(&temp, "MyApp", SCRIPT, &["-V", "2.5", "-I", "com.example.MyApp"]);

    let info = read_plist(&app.join("Contents/Info.plist"));
    assert_eq!(string_value(&info, "CFBundleExecutable"), "MyApp");
    assert_eq!(string_value(&info, "CFBundleName"), "MyApp");
    assert_eq!(string_value(&info, "CFBundleIdentifier"), "com.example.MyApp");
    assert_eq!(string_value(&info, "CFBundleShortVersionString"), "2.5");
    assert_eq!(string_value(&info, "CFBundlePackageType"), "APPL");
}

#[test]
fn test_app_settings_format_follows_xml_flag() {
    let temp = TempDir::new().unwrap();
    let binary = create_app(&temp, "MyApp", SCRIPT, &[]);
    let bytes = fs::read(binary.join("Contents/Resources/AppSettings.plist")).unwrap();
    assert!(bytes.starts_with(b"bplist00"));

    let xml = create_app(&temp, "MyApp", SCRIPT, &["-x"]);
    let bytes = fs::read(xml.join("Contents/Resources/AppSettings.plist")).unwrap();
    assert!(bytes.starts_with(b"<?xml"));

    let settings = read_plist(&xml.join("Contents/Resources/AppSettings.plist"));
    assert_eq!(string_value(&settings, "InterpreterPath"), "/bin/sh");
    assert!(settings.get("Identifier").is_none());
}

#[test]
fn test_destination_defaults_to_name() {
    let temp = TempDir::new().unwrap();
    let script = write_script(temp.path(), "Greeter.sh", SCRIPT);

    let output = platypus_cmd(&temp).arg(&script).output().unwrap();
    assert_success(&output);
    assert!(temp.path().join("Greeter.app/Contents/MacOS/Greeter").is_file());

    let output = platypus_cmd(&temp)
        .args(["-a", "Other"])
        .arg(&script)
        .arg("Elsewhere")
        .output()
        .unwrap();
    assert_success(&output);
    assert!(temp.path().join("Elsewhere.app/Contents/MacOS/Other").is_file());
}

#[test]
fn test_bundled_directory_is_copied_recursively() {
    let temp = TempDir::new().unwrap();
    let assets = temp.path().join("assets");
    fs::create_dir_all(assets.join("nested")).unwrap();
    fs::write(assets.join("nested/data.txt"), "payload").unwrap();

    let app = create_app(&temp, "MyApp", SCRIPT, &["-f", assets.to_str().unwrap()]);
    assert_eq!(
        fs::read_to_string(app.join("Contents/Resources/assets/nested/data.txt")).unwrap(),
        "payload"
    );
}

#[test]
fn test_bad_icon_fails_without_trace() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("icon.txt"), "not an image").unwrap();
    let script = write_script(temp.path(), "script.sh", SCRIPT);

    let output = platypus_cmd(&temp)
        .args(["-i", "icon.txt", "-a", "MyApp"])
        .arg(&script)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("icon"));
    assert!(!temp.path().join("MyApp.app").exists());

    let leftovers: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains("staging"))
        .collect();
    assert!(leftovers.is_empty(), "staging left behind: {:?}", leftovers);
}

#[test]
fn test_development_version_links_script() {
    let temp = TempDir::new().unwrap();
    let app = create_app(&temp, "MyApp", SCRIPT, &["-d"]);

    let script = app.join("Contents/Resources/script");
    assert!(fs::symlink_metadata(&script).unwrap().file_type().is_symlink());
    let target = fs::read_link(&script).unwrap();
    assert_eq!(target, dunce::canonicalize(temp.path().join("script.sh")).unwrap());
}
