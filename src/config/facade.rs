//! Config loader facade: single entry point for building a [`PlatypusConfig`].

use super::merge::builder_with_defaults;
use super::sources::{add_environment, add_explicit_file, add_global_file};
use super::PlatypusConfig;
use crate::error::PlatypusError;
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    ///
    /// Precedence (lowest to highest): defaults, global file, `explicit` file, environment.
    pub fn load(explicit: Option<&Path>) -> Result<PlatypusConfig, PlatypusError> {
        let mut builder = builder_with_defaults()?;
        builder = add_global_file(builder)?;
        if let Some(path) = explicit {
            builder = add_explicit_file(builder, path)?;
        }
        builder = add_environment(builder);

        let config: PlatypusConfig = builder.build()?.try_deserialize()?;
        config
            .validate()
            .map_err(|errors| PlatypusError::Config(errors.join("; ")))?;
        Ok(config)
    }

    /// Load only the given file on top of the defaults (no global file, no environment)
    pub fn load_from_file(path: &Path) -> Result<PlatypusConfig, PlatypusError> {
        let builder = add_explicit_file(builder_with_defaults()?, path)?;
        let config: PlatypusConfig = builder.build()?.try_deserialize()?;
        config
            .validate()
            .map_err(|errors| PlatypusError::Config(errors.join("; ")))?;
        Ok(config)
    }
}
