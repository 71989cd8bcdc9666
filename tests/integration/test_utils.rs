//! Shared test utilities for integration tests
//!
//! Every binary invocation runs with an isolated HOME and XDG config directory so a
//! developer's global platypus config never leaks into a test.

use plist::{Dictionary, Value};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across in-process tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    home: Option<String>,
    xdg_config_home: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            home: std::env::var("HOME").ok(),
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
        }
    }

    fn restore(self) {
        match self.home {
            Some(orig) => std::env::set_var("HOME", orig),
            None => std::env::remove_var("HOME"),
        }
        match self.xdg_config_home {
            Some(orig) => std::env::set_var("XDG_CONFIG_HOME", orig),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir`, restoring them after
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let home = home_dir(test_dir);
    let config_home = config_home(test_dir);
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&config_home).unwrap();
    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", &config_home);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
    env_state.restore();
    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

fn home_dir(test_dir: &TempDir) -> PathBuf {
    test_dir.path().join("home")
}

fn config_home(test_dir: &TempDir) -> PathBuf {
    test_dir.path().join("config")
}

/// Write a global config file where both the Linux and macOS lookups will find it
pub fn write_global_config(test_dir: &TempDir, contents: &str) {
    for dir in [
        config_home(test_dir).join("platypus"),
        home_dir(test_dir).join("Library/Application Support/platypus"),
    ] {
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), contents).unwrap();
    }
}

/// `platypus` running in `test_dir` with an isolated environment and the freshly
/// built launcher configured as the bundle runtime
pub fn platypus_cmd(test_dir: &TempDir) -> Command {
    let home = home_dir(test_dir);
    let config_home = config_home(test_dir);
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&config_home).unwrap();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_platypus"));
    cmd.current_dir(test_dir.path())
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", &config_home)
        .env("PLATYPUS__RESOURCES__LAUNCHER", env!("CARGO_BIN_EXE_scriptexec"))
        .env_remove("PLATYPUS_LOG")
        .env("USER", "tester");
    cmd
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed with {:?}: stderr={}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn parse_plist(bytes: &[u8]) -> Dictionary {
    Value::from_reader(Cursor::new(bytes))
        .expect("valid property list")
        .into_dictionary()
        .expect("top-level dictionary")
}

pub fn read_plist(path: &Path) -> Dictionary {
    parse_plist(&fs::read(path).unwrap())
}

/// Emit the profile for `args` to stdout and parse it
pub fn profile_for_args(test_dir: &TempDir, args: &[&str]) -> Dictionary {
    let output = platypus_cmd(test_dir)
        .args(args)
        .args(["-O", "-"])
        .output()
        .unwrap();
    assert_success(&output);
    parse_plist(&output.stdout)
}

pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

/// Build `<name>.app` in `test_dir` from a script with the given body
pub fn create_app(test_dir: &TempDir, name: &str, body: &str, args: &[&str]) -> PathBuf {
    let script = write_script(test_dir.path(), "script.sh", body);
    let destination = test_dir.path().join(format!("{}.app", name));
    let output = platypus_cmd(test_dir)
        .args(args)
        .args(["--overwrite", "--name", name])
        .arg(&script)
        .arg(&destination)
        .output()
        .unwrap();
    assert_success(&output);
    destination
}

pub fn string_value<'a>(dict: &'a Dictionary, key: &str) -> &'a str {
    dict.get(key)
        .and_then(Value::as_string)
        .unwrap_or_else(|| panic!("{} is not a string", key))
}

pub fn bool_value(dict: &Dictionary, key: &str) -> bool {
    dict.get(key)
        .and_then(Value::as_boolean)
        .unwrap_or_else(|| panic!("{} is not a boolean", key))
}

pub fn string_list(dict: &Dictionary, key: &str) -> Vec<String> {
    dict.get(key)
        .and_then(Value::as_array)
        .unwrap_or_else(|| panic!("{} is not an array", key))
        .iter()
        .filter_map(Value::as_string)
        .map(str::to_string)
        .collect()
}
