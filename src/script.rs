//! Script inspection: interpreter detection and default app naming.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// A known interpreter and the file suffixes that imply it
#[derive(Debug)]
pub struct KnownInterpreter {
    pub display_name: &'static str,
    pub path: &'static str,
    pub suffixes: &'static [&'static str],
}

pub const KNOWN_INTERPRETERS: &[KnownInterpreter] = &[
    KnownInterpreter { display_name: "Shell", path: "/bin/sh", suffixes: &["sh", "command"] },
    KnownInterpreter { display_name: "Bash", path: "/bin/bash", suffixes: &["bash"] },
    KnownInterpreter { display_name: "Zsh", path: "/bin/zsh", suffixes: &["zsh"] },
    KnownInterpreter { display_name: "Python", path: "/usr/bin/python3", suffixes: &["py"] },
    KnownInterpreter { display_name: "Perl", path: "/usr/bin/perl", suffixes: &["pl", "pm"] },
    KnownInterpreter { display_name: "Ruby", path: "/usr/bin/ruby", suffixes: &["rb"] },
    KnownInterpreter { display_name: "PHP", path: "/usr/bin/php", suffixes: &["php"] },
    KnownInterpreter { display_name: "Tcl", path: "/usr/bin/tclsh", suffixes: &["tcl"] },
    KnownInterpreter { display_name: "Expect", path: "/usr/bin/expect", suffixes: &["exp", "expect"] },
    KnownInterpreter { display_name: "Node", path: "/usr/local/bin/node", suffixes: &["js"] },
    KnownInterpreter { display_name: "Swift", path: "/usr/bin/swift", suffixes: &["swift"] },
    KnownInterpreter { display_name: "AppleScript", path: "/usr/bin/osascript", suffixes: &["scpt", "applescript"] },
];

/// Interpreter implied by a script's file suffix
pub fn interpreter_for_suffix(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    KNOWN_INTERPRETERS
        .iter()
        .find(|i| i.suffixes.contains(&ext.as_str()))
        .map(|i| i.path)
}

/// Interpreter and arguments from a `#!` line, e.g. `["/usr/bin/env", "python3"]`
pub fn parse_shebang(path: &Path) -> std::io::Result<Option<Vec<String>>> {
    let file = File::open(path)?;
    let mut first = String::new();
    // non-UTF-8 first lines are not shebangs we can use
    if BufReader::new(file).read_line(&mut first).is_err() {
        return Ok(None);
    }
    let Some(rest) = first.strip_prefix("#!") else {
        return Ok(None);
    };
    let parts: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(parts))
    }
}

/// Interpreter path and interpreter arguments for a script.
///
/// The shebang line wins over the suffix. Returns `None` when neither says anything.
pub fn detect_interpreter(path: &Path) -> Option<(String, Vec<String>)> {
    match parse_shebang(path) {
        Ok(Some(mut parts)) => {
            let interpreter = parts.remove(0);
            debug!(script = %path.display(), interpreter = %interpreter, "Interpreter from shebang");
            return Some((interpreter, parts));
        }
        Ok(None) => {}
        Err(e) => debug!(script = %path.display(), error = %e, "Could not read script for shebang"),
    }
    interpreter_for_suffix(path).map(|p| (p.to_string(), Vec::new()))
}

/// App name derived from a script file name: the file stem
pub fn app_name_from_script(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
