//! Merge rules: built-in defaults at the bottom of the stack.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a Config builder with built-in defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("defaults.app_name", crate::profile::DEFAULT_APP_NAME)?
        .set_default("defaults.identifier_prefix", "org")?
        .set_default("resources.share_dir", "/usr/local/share/platypus")?
        .set_default("resources.strip_tool", "/usr/bin/strip")?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
