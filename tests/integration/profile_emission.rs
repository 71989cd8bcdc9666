//! Profile emission through `-O -`: defaults, and every flag kind round-tripping
//! into the emitted property list.

use super::test_utils::{
    bool_value, parse_plist, platypus_cmd, profile_for_args, string_list, string_value,
};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

const BOOLEAN_FIELDS: &[&str] = &[
    "Authentication",
    "AppPathAsFirstArg",
    "Droppable",
    "AcceptsFiles",
    "AcceptsText",
    "DeclareService",
    "RunInBackground",
    "PromptForFileOnLaunch",
    "StatusItemUseSystemFont",
    "UseXMLPlistFormat",
    "DevelopmentVersion",
    "OptimizeApplication",
    "Overwrite",
];

#[test]
fn test_default_profile_sanity() {
    let temp = TempDir::new().unwrap();
    let plist = profile_for_args(&temp, &[]);

    assert_eq!(string_value(&plist, "Version"), "1.0");
    assert_eq!(string_value(&plist, "InterpreterPath"), "/bin/sh");
    assert_eq!(string_value(&plist, "InterfaceType"), "Text Window");
    assert!(string_list(&plist, "BundledFiles").is_empty());
    assert!(!bool_value(&plist, "Authentication"));
    assert!(bool_value(&plist, "RemainRunning"));
    assert!(!string_value(&plist, "Name").is_empty());

    let identifier = Regex::new(r"^\w+\.\w+\.\w+").unwrap();
    assert!(identifier.is_match(string_value(&plist, "Identifier")));
}

#[test]
fn test_boolean_switches_set_only_their_fields() {
    let temp = TempDir::new().unwrap();
    let cases: &[(&str, &[&str])] = &[
        ("-A", &["Authentication"]),
        ("-D", &["Droppable", "AcceptsFiles"]),
        ("-F", &["AcceptsText"]),
        ("-N", &["DeclareService"]),
        ("-B", &["RunInBackground"]),
        ("-E", &["AppPathAsFirstArg"]),
        ("-Z", &["PromptForFileOnLaunch"]),
        ("-c", &["StatusItemUseSystemFont"]),
        ("-x", &["UseXMLPlistFormat"]),
        ("-d", &["DevelopmentVersion"]),
        ("-l", &["OptimizeApplication"]),
        ("-y", &["Overwrite"]),
    ];

    for (flag, fields) in cases {
        let plist = profile_for_args(&temp, &[flag]);
        for field in BOOLEAN_FIELDS {
            assert_eq!(
                bool_value(&plist, field),
                fields.contains(field),
                "{} should set exactly {:?}, {} was wrong",
                flag,
                fields,
                field
            );
        }
        assert!(bool_value(&plist, "RemainRunning"), "{} touched RemainRunning", flag);
    }
}

#[test]
fn test_quit_after_execution_is_inverse() {
    let temp = TempDir::new().unwrap();
    for flag in ["-R", "--quit-after-execution"] {
        let plist = profile_for_args(&temp, &[flag]);
        assert!(!bool_value(&plist, "RemainRunning"));
    }
}

#[test]
fn test_string_flags_round_trip() {
    let temp = TempDir::new().unwrap();
    let cases = [
        ("-a", "Name", "MyAppName"),
        ("-o", "InterfaceType", "Progress Bar"),
        ("-p", "InterpreterPath", "/usr/bin/perl"),
        ("-V", "Version", "3.2"),
        ("-u", "Author", "Alan Smithee"),
        ("-I", "Identifier", "org.something.Blergh"),
        ("-b", "TextBackground", "#000000"),
        ("-g", "TextForeground", "#ffeeee"),
        ("-n", "TextFont", "Comic Sans 13"),
        ("-K", "StatusItemDisplayType", "Icon"),
        ("-Y", "StatusItemTitle", "My Silly, Title!"),
    ];

    for (flag, key, value) in cases {
        let plist = profile_for_args(&temp, &[flag, value]);
        assert_eq!(string_value(&plist, key), value, "{} did not round-trip", flag);
    }
}

#[test]
fn test_path_flags_resolve() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("dummy.icns"), b"icns\0\0\0\x08").unwrap();

    for (flag, key) in [
        ("-i", "IconPath"),
        ("-Q", "DocIconPath"),
        ("-L", "StatusItemIcon"),
    ] {
        let plist = profile_for_args(&temp, &[flag, "dummy.icns"]);
        let resolved = string_value(&plist, key);
        assert!(resolved.starts_with('/'), "{} was not resolved: {}", key, resolved);
        assert!(resolved.ends_with("dummy.icns"));
    }
}

#[test]
fn test_list_flags_split_on_pipe() {
    let temp = TempDir::new().unwrap();
    let dummy1 = temp.path().join("dummy1");
    let dummy2 = temp.path().join("dummy2");
    fs::write(&dummy1, "").unwrap();
    fs::write(&dummy2, "").unwrap();
    let bundled = format!("{}|{}", dummy1.display(), dummy2.display());

    let cases: Vec<(&str, &str, String)> = vec![
        ("-G", "InterpreterArgs", "-a|-b|-c".to_string()),
        ("-C", "ScriptArgs", "-e|-f|-g".to_string()),
        ("-f", "BundledFiles", bundled),
        ("-X", "Suffixes", "txt|png|pdf".to_string()),
        ("-T", "UniformTypes", "public.text|public.rtf".to_string()),
        ("-U", "URISchemes", "https|ssh".to_string()),
    ];

    for (flag, key, raw) in cases {
        let plist = profile_for_args(&temp, &[flag, &raw]);
        let emitted: HashSet<String> = string_list(&plist, key).into_iter().collect();
        let expected: HashSet<String> = raw.split('|').map(str::to_string).collect();
        assert_eq!(emitted, expected, "{} list mismatch", flag);
    }
}

#[test]
fn test_profile_written_to_file() {
    let temp = TempDir::new().unwrap();
    let output = platypus_cmd(&temp)
        .args(["-x", "-a", "Saved", "-O", "saved.platypus"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let bytes = fs::read(temp.path().join("saved.platypus")).unwrap();
    assert!(bytes.starts_with(b"<?xml"));
    assert_eq!(string_value(&parse_plist(&bytes), "Name"), "Saved");
}

#[test]
fn test_load_profile_then_override() {
    let temp = TempDir::new().unwrap();
    let output = platypus_cmd(&temp)
        .args(["-a", "Saved", "-o", "Status Menu", "-O", "saved.platypus"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plist = profile_for_args(&temp, &["-P", "saved.platypus", "-V", "9.9"]);
    assert_eq!(string_value(&plist, "Name"), "Saved");
    assert_eq!(string_value(&plist, "InterfaceType"), "Status Menu");
    assert_eq!(string_value(&plist, "Version"), "9.9");
}

#[test]
fn test_option_errors_exit_with_usage_code() {
    let temp = TempDir::new().unwrap();

    let unknown = platypus_cmd(&temp).args(["-j", "-O", "-"]).output().unwrap();
    assert_eq!(unknown.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&unknown.stderr).contains("Unknown option"));
    assert!(unknown.stdout.is_empty());

    let missing = platypus_cmd(&temp).arg("-a").output().unwrap();
    assert_eq!(missing.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("-a"));
}

#[test]
fn test_validation_errors_name_the_field() {
    let temp = TempDir::new().unwrap();
    let output = platypus_cmd(&temp)
        .args(["-I", "nodots", "-b", "black", "-O", "-"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Identifier"));
    assert!(stderr.contains("TextBackground"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    let output = platypus_cmd(&temp).arg("-v").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("platypus "));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
