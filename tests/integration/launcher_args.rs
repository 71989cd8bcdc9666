//! The launcher runtime inside a built bundle: argument vectors, working
//! directory, exit codes and queued drop events.

use super::test_utils::create_app;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const ECHO_ARGS: &str = "#!/bin/sh\nfor a in \"$@\"; do echo \"$a\"; done\n";

fn run_app(app: &Path, name: &str, args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(app.join("Contents/MacOS").join(name))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_argument_vector_order() {
    let temp = TempDir::new().unwrap();
    let app = create_app(&temp, "Args", ECHO_ARGS, &["-R", "-C", "-e|-f"]);

    let output = run_app(&app, "Args", &["one", "-psn_0_1234", "two"], "");
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["-e", "-f", "one", "two"]);
}

#[test]
fn test_app_path_passed_as_first_argument() {
    let temp = TempDir::new().unwrap();
    let app = create_app(&temp, "WithPath", ECHO_ARGS, &["-R", "-E", "-C", "--flag"]);

    let output = run_app(&app, "WithPath", &["dropped"], "");
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![app.to_string_lossy().into_owned(), "--flag".to_string(), "dropped".to_string()]
    );
}

#[test]
fn test_empty_script_argument_survives() {
    let temp = TempDir::new().unwrap();
    let app = create_app(&temp, "Blank", ECHO_ARGS, &["-R", "-C", "x||y"]);

    let output = run_app(&app, "Blank", &[], "");
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["x", "", "y"]);
}

#[test]
fn test_script_runs_in_resources_directory() {
    let temp = TempDir::new().unwrap();
    let app = create_app(&temp, "Cwd", "#!/bin/sh\npwd -P\n", &["-R"]);

    let output = run_app(&app, "Cwd", &[], "");
    let expected = dunce::canonicalize(app.join("Contents/Resources")).unwrap();
    assert_eq!(stdout_lines(&output), vec![expected.to_string_lossy().into_owned()]);
}

#[test]
fn test_exit_code_propagates_when_quitting_after_execution() {
    let temp = TempDir::new().unwrap();
    let app = create_app(&temp, "Fails", "#!/bin/sh\necho failing\nexit 5\n", &["-R"]);

    let output = run_app(&app, "Fails", &[], "");
    assert_eq!(output.status.code(), Some(5));
    assert_eq!(stdout_lines(&output), vec!["failing"]);
}

#[test]
fn test_remain_running_serves_drops_until_closed() {
    let temp = TempDir::new().unwrap();
    let app = create_app(&temp, "Stays", ECHO_ARGS, &["-F"]);

    let output = run_app(&app, "Stays", &["first"], "second\nthird\n");
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["first", "second", "third"]);
}

#[test]
fn test_text_drops_ignored_without_accepts_text() {
    let temp = TempDir::new().unwrap();
    let app = create_app(&temp, "NoText", ECHO_ARGS, &[]);

    let output = run_app(&app, "NoText", &["first"], "dropped text\n");
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["first"]);
}

#[test]
fn test_development_bundle_launches_through_symlink() {
    let temp = TempDir::new().unwrap();
    let app = create_app(&temp, "Dev", ECHO_ARGS, &["-d", "-R"]);

    let output = run_app(&app, "Dev", &["linked"], "");
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout_lines(&output), vec!["linked"]);
}

#[test]
fn test_missing_interpreter_is_reported() {
    let temp = TempDir::new().unwrap();
    let app = create_app(&temp, "Broken", ECHO_ARGS, &["-R", "-p", "/nonexistent/interp"]);

    let output = run_app(&app, "Broken", &[], "");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Interpreter not found"));
}
