//! Profile validation and freezing.

use crate::error::{ProfileError, Violation};
use crate::profile::field::Field;
use crate::profile::model::Profile;
use regex::Regex;
use std::collections::HashSet;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[\w-]+\.[\w-]+\.[\w-]+(\.[\w-]+)*$").expect("identifier pattern compiles")
    })
}

/// Whether an identifier has the dot-separated three-token form
pub fn is_valid_identifier(identifier: &str) -> bool {
    identifier_pattern().is_match(identifier)
}

/// Whether a string is a `#rrggbb` colour
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) if digits.len() == 6 => hex::decode(digits).is_ok(),
        _ => false,
    }
}

/// A profile that passed validation. Immutable from here on.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProfile(Profile);

impl Deref for ValidatedProfile {
    type Target = Profile;

    fn deref(&self) -> &Profile {
        &self.0
    }
}

impl ValidatedProfile {
    pub fn into_inner(self) -> Profile {
        self.0
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    dunce::canonicalize(&joined).unwrap_or(joined)
}

impl Profile {
    /// Validate against the current working directory. See [`Profile::finalize_in`].
    pub fn finalize(self) -> Result<ValidatedProfile, ProfileError> {
        let base = std::env::current_dir().map_err(|e| {
            ProfileError::Validation(vec![Violation::new(
                "WorkingDirectory",
                format!("cannot determine working directory: {}", e),
            )])
        })?;
        self.finalize_in(&base)
    }

    /// Run every validator and freeze the profile.
    ///
    /// Icon and script paths are resolved to absolute paths relative to `base`. All
    /// violations are collected before failing.
    pub fn finalize_in(mut self, base: &Path) -> Result<ValidatedProfile, ProfileError> {
        let mut violations = Vec::new();

        if self.name.trim().is_empty() {
            violations.push(Violation::new(Field::Name.key(), "must not be empty"));
        } else if self.name.contains('/') || self.name == "." || self.name == ".." {
            violations.push(Violation::new(Field::Name.key(), "must be usable as a file name"));
        }
        if self.version.trim().is_empty() {
            violations.push(Violation::new(Field::Version.key(), "must not be empty"));
        }
        if !is_valid_identifier(&self.identifier) {
            violations.push(Violation::new(
                Field::Identifier.key(),
                format!(
                    "{:?} must have the form prefix.author.name (e.g. org.example.MyApp)",
                    self.identifier
                ),
            ));
        }
        if self.interpreter_path.trim().is_empty() {
            violations.push(Violation::new(Field::InterpreterPath.key(), "must not be empty"));
        }
        for (field, value) in [
            (Field::TextForeground, &self.text_foreground),
            (Field::TextBackground, &self.text_background),
        ] {
            if !is_hex_color(value) {
                violations.push(Violation::new(
                    field.key(),
                    format!("{:?} is not a #rrggbb colour", value),
                ));
            }
        }

        for (field, slot) in [
            (Field::IconPath, &mut self.icon_path),
            (Field::DocIconPath, &mut self.doc_icon_path),
            (Field::StatusItemIcon, &mut self.status_item_icon),
            (Field::ScriptPath, &mut self.script_path),
        ] {
            if let Some(path) = slot.as_ref() {
                let resolved = resolve(base, path);
                if !resolved.is_file() {
                    violations.push(Violation::new(
                        field.key(),
                        format!("no such file: {}", path.display()),
                    ));
                }
                *slot = Some(resolved);
            }
        }

        let mut seen_names = HashSet::new();
        for path in &self.bundled_files {
            if !path.is_absolute() {
                violations.push(Violation::new(
                    Field::BundledFiles.key(),
                    format!("{} is not an absolute path", path.display()),
                ));
                continue;
            }
            if !path.exists() {
                violations.push(Violation::new(
                    Field::BundledFiles.key(),
                    format!("no such file: {}", path.display()),
                ));
            }
            match path.file_name() {
                Some(name) => {
                    if !seen_names.insert(name.to_os_string()) {
                        violations.push(Violation::new(
                            Field::BundledFiles.key(),
                            format!("more than one bundled file is named {:?}", name),
                        ));
                    }
                }
                None => violations.push(Violation::new(
                    Field::BundledFiles.key(),
                    format!("{} has no file name", path.display()),
                )),
            }
        }

        if violations.is_empty() {
            Ok(ValidatedProfile(self))
        } else {
            Err(ProfileError::Validation(violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_profile_validates() {
        let temp = TempDir::new().unwrap();
        assert!(Profile::default().finalize_in(temp.path()).is_ok());
    }

    #[test]
    fn test_identifier_pattern() {
        assert!(is_valid_identifier("org.something.Blergh"));
        assert!(is_valid_identifier("com.my-company.tool.helper"));
        assert!(!is_valid_identifier("something.Blergh"));
        assert!(!is_valid_identifier("org..Blergh"));
        assert!(!is_valid_identifier("org.some thing.Blergh"));
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#ffeeee"));
        assert!(is_hex_color("#000000"));
        assert!(!is_hex_color("ffeeee"));
        assert!(!is_hex_color("#ffee"));
        assert!(!is_hex_color("#gggggg"));
    }

    #[test]
    fn test_violations_are_aggregated() {
        let temp = TempDir::new().unwrap();
        let mut profile = Profile::default();
        profile.name = String::new();
        profile.identifier = "bogus".to_string();
        profile.icon_path = Some(PathBuf::from("missing.icns"));

        match profile.finalize_in(temp.path()) {
            Err(ProfileError::Validation(violations)) => {
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert!(fields.contains(&"Name"));
                assert!(fields.contains(&"Identifier"));
                assert!(fields.contains(&"IconPath"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_relative_icon_path_is_resolved() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("dummy.icns"), b"icns").unwrap();
        let mut profile = Profile::default();
        profile.icon_path = Some(PathBuf::from("dummy.icns"));

        let validated = profile.finalize_in(temp.path()).unwrap();
        let resolved = validated.icon_path.clone().unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("dummy.icns"));
    }

    #[test]
    fn test_bundled_files_rules() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("one").join("data.txt");
        let b = temp.path().join("two").join("data.txt");
        fs::create_dir_all(a.parent().unwrap()).unwrap();
        fs::create_dir_all(b.parent().unwrap()).unwrap();
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();

        let mut profile = Profile::default();
        profile.bundled_files = vec![a, b, PathBuf::from("relative.txt")];
        match profile.finalize_in(temp.path()) {
            Err(ProfileError::Validation(violations)) => {
                assert_eq!(violations.len(), 2);
                assert!(violations.iter().all(|v| v.field == "BundledFiles"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}
