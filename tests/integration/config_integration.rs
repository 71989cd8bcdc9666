//! Layered configuration: global file, explicit `--config` file, environment

use super::test_utils::{
    parse_plist, platypus_cmd, profile_for_args, string_value, with_isolated_env,
    write_global_config,
};
use platypus::config::ConfigLoader;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_global_config_supplies_profile_defaults() {
    let temp = TempDir::new().unwrap();
    write_global_config(
        &temp,
        "[defaults]\napp_name = \"Configured\"\nauthor = \"Jane Doe\"\nidentifier_prefix = \"com\"\n",
    );

    let plist = profile_for_args(&temp, &[]);
    assert_eq!(string_value(&plist, "Name"), "Configured");
    assert_eq!(string_value(&plist, "Author"), "Jane Doe");
    assert_eq!(string_value(&plist, "Identifier"), "com.JaneDoe.Configured");
}

#[test]
fn test_explicit_config_overrides_global() {
    let temp = TempDir::new().unwrap();
    write_global_config(&temp, "[defaults]\napp_name = \"Global\"\n");
    let explicit = temp.path().join("explicit.toml");
    fs::write(&explicit, "[defaults]\napp_name = \"Explicit\"\n").unwrap();

    let output = platypus_cmd(&temp)
        .arg("--config")
        .arg(&explicit)
        .args(["-O", "-"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let plist = parse_plist(&output.stdout);
    assert_eq!(string_value(&plist, "Name"), "Explicit");
}

#[test]
fn test_environment_overrides_files() {
    let temp = TempDir::new().unwrap();
    write_global_config(&temp, "[defaults]\napp_name = \"Global\"\n");

    let output = platypus_cmd(&temp)
        .env("PLATYPUS__DEFAULTS__APP_NAME", "FromEnv")
        .args(["-O", "-"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let plist = parse_plist(&output.stdout);
    assert_eq!(string_value(&plist, "Name"), "FromEnv");
}

#[test]
fn test_missing_explicit_config_fails() {
    let temp = TempDir::new().unwrap();
    let output = platypus_cmd(&temp)
        .args(["--config", "nowhere.toml", "-O", "-"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration error"));
}

#[test]
fn test_loader_reads_isolated_global_file() {
    let temp = TempDir::new().unwrap();
    write_global_config(&temp, "[resources]\nshare_dir = \"/opt/platypus\"\n");

    let config = with_isolated_env(&temp, || ConfigLoader::load(None).unwrap());
    assert_eq!(config.resources.share_dir, std::path::PathBuf::from("/opt/platypus"));
    assert_eq!(config.defaults.identifier_prefix, "org");
}
