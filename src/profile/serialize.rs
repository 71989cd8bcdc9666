//! Property-list emission and loading of profiles.

use crate::error::ProfileError;
use crate::profile::field::Field;
use crate::profile::model::Profile;
use crate::profile::validate::ValidatedProfile;
use plist::{Dictionary, Value};
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Destination token that sends emitted profiles to standard output
pub const STDOUT_TARGET: &str = "-";

/// Property-list encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlistFormat {
    Binary,
    Xml,
}

impl PlistFormat {
    pub fn for_xml_flag(use_xml: bool) -> Self {
        if use_xml {
            PlistFormat::Xml
        } else {
            PlistFormat::Binary
        }
    }
}

/// Encode a dictionary in the given format
pub fn encode_dictionary(dict: Dictionary, format: PlistFormat) -> Result<Vec<u8>, plist::Error> {
    let value = Value::Dictionary(dict);
    let mut buf = Vec::new();
    match format {
        PlistFormat::Binary => value.to_writer_binary(&mut buf)?,
        PlistFormat::Xml => value.to_writer_xml(&mut buf)?,
    }
    Ok(buf)
}

impl Profile {
    /// Dictionary of the selected fields, keyed by their property-list keys
    pub fn to_dictionary_filtered(&self, include: impl Fn(Field) -> bool) -> Dictionary {
        let mut dict = Dictionary::new();
        for field in Field::ALL.iter().copied().filter(|f| include(*f)) {
            if let Some(value) = self.value(field) {
                dict.insert(field.key().to_string(), value);
            }
        }
        dict
    }

    /// Dictionary of every field
    pub fn to_dictionary(&self) -> Dictionary {
        self.to_dictionary_filtered(|_| true)
    }

    /// Apply every recognized key of a saved profile onto this profile.
    ///
    /// Unknown keys are skipped with a warning so profiles written by newer versions
    /// still load.
    pub fn apply_dictionary(&mut self, dict: &Dictionary) -> Result<(), ProfileError> {
        for (key, value) in dict {
            match Field::from_key(key) {
                Ok(field) => self.put_value(field, value)?,
                Err(_) => warn!(key = %key, "Ignoring unknown profile key"),
            }
        }
        Ok(())
    }

    /// Load a saved profile (binary or XML) on top of this profile
    pub fn load_from(&mut self, path: &Path) -> Result<(), ProfileError> {
        let load_err = |reason: String| ProfileError::ProfileLoad {
            path: path.to_path_buf(),
            reason,
        };
        let value = Value::from_file(path).map_err(|e| load_err(e.to_string()))?;
        let dict = value
            .into_dictionary()
            .ok_or_else(|| load_err("top-level object is not a dictionary".to_string()))?;
        self.apply_dictionary(&dict)?;
        debug!(profile = %path.display(), "Loaded profile");
        Ok(())
    }
}

impl ValidatedProfile {
    /// Encode the full profile
    pub fn serialize(&self, format: PlistFormat) -> Result<Vec<u8>, ProfileError> {
        encode_dictionary(self.to_dictionary(), format).map_err(|e| ProfileError::Emit(e.to_string()))
    }

    /// Write the profile to a file, or to standard output when `target` is `-`
    pub fn write_to(&self, target: &str, format: PlistFormat) -> Result<(), ProfileError> {
        let bytes = self.serialize(format)?;
        if target == STDOUT_TARGET {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(&bytes)
                .and_then(|_| lock.flush())
                .map_err(|e| ProfileError::Emit(e.to_string()))?;
        } else {
            std::fs::write(target, &bytes)
                .map_err(|e| ProfileError::Emit(format!("{}: {}", target, e)))?;
        }
        debug!(target = %target, bytes = bytes.len(), "Wrote profile");
        Ok(())
    }
}
