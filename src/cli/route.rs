//! CLI route: turns a parsed command line into a profile, then either emits the
//! profile or hands it to the materializer.

use crate::bundle::{Bundle, Materializer, SharedResources};
use crate::cli::parse::ParsedCommand;
use crate::config::{ConfigLoader, PlatypusConfig};
use crate::error::{PlatypusError, ProfileError};
use crate::options::{apply_matches, AppliedOptions};
use crate::profile::{Field, PlistFormat, Profile, ValidatedProfile};
use crate::script::{app_name_from_script, detect_interpreter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_EXTENSION: &str = "app";

/// What a successful run produced
#[derive(Debug)]
pub enum Outcome {
    Version(String),
    ProfileWritten(String),
    BundleCreated(Bundle),
}

/// CLI execution context: the loaded tool configuration
pub struct RunContext {
    config: PlatypusConfig,
}

impl RunContext {
    /// Load configuration (global file, `config_path`, environment) and build a context
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, PlatypusError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: PlatypusConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlatypusConfig {
        &self.config
    }

    pub fn execute(&self, parsed: &ParsedCommand) -> Result<Outcome, PlatypusError> {
        if parsed.cli.version {
            return Ok(Outcome::Version(format!("platypus {}", env!("CARGO_PKG_VERSION"))));
        }

        let profile = self.build_profile(parsed)?;

        if let Some(target) = &parsed.cli.generate_profile {
            let format = PlistFormat::for_xml_flag(profile.use_xml_plist_format);
            profile.write_to(target, format)?;
            return Ok(Outcome::ProfileWritten(target.clone()));
        }

        let script = profile
            .script_path
            .clone()
            .ok_or_else(|| ProfileError::MissingArgument("script path".to_string()))?;
        let destination = destination_for(parsed.cli.destination.as_deref(), &profile.name);

        let resources = SharedResources::resolve(&self.config.resources)?;
        let bundle = Materializer::new(resources).materialize(&profile, &script, &destination)?;
        Ok(Outcome::BundleCreated(bundle))
    }

    /// Build and validate the profile for this command line.
    ///
    /// Precedence, lowest first: configured defaults, a `-P` profile, values derived
    /// from the script, explicit flags.
    pub fn build_profile(&self, parsed: &ParsedCommand) -> Result<ValidatedProfile, PlatypusError> {
        let defaults = &self.config.defaults;
        let mut profile = Profile::with_defaults(defaults);

        let loaded = parsed.cli.load_profile.is_some();
        if let Some(path) = &parsed.cli.load_profile {
            profile.load_from(path)?;
        }

        let applied = apply_matches(&mut profile, &parsed.matches)?;

        if let Some(script) = &parsed.cli.script {
            profile.script_path = Some(script.clone());
            if !loaded {
                derive_from_script(&mut profile, script, &applied);
            }
        }

        let renamed = applied.is_explicit(Field::Name) || !loaded;
        if renamed && !applied.is_explicit(Field::StatusItemTitle) {
            profile.status_item_title = profile.name.clone();
        }
        let identity_changed =
            !loaded || applied.is_explicit(Field::Name) || applied.is_explicit(Field::Author);
        if identity_changed && !applied.is_explicit(Field::Identifier) {
            profile.derive_identifier(&defaults.identifier_prefix);
        }

        debug!(name = %profile.name, identifier = %profile.identifier, "Profile assembled");
        Ok(profile.finalize()?)
    }
}

/// Name and interpreter implied by the script, unless given explicitly
fn derive_from_script(profile: &mut Profile, script: &Path, applied: &AppliedOptions) {
    if !applied.is_explicit(Field::Name) {
        if let Some(name) = app_name_from_script(script) {
            profile.name = name;
        }
    }
    if !applied.is_explicit(Field::InterpreterPath) {
        if let Some((interpreter, args)) = detect_interpreter(script) {
            info!(interpreter = %interpreter, "Detected script interpreter");
            profile.interpreter_path = interpreter;
            if !applied.is_explicit(Field::InterpreterArgs) {
                profile.interpreter_args = args;
            }
        }
    }
}

/// Destination bundle path: the given path with `.app` appended when missing, or
/// `<name>.app` in the working directory
pub fn destination_for(given: Option<&Path>, name: &str) -> PathBuf {
    match given {
        Some(path) if path.extension().is_some_and(|ext| ext == APP_EXTENSION) => path.to_path_buf(),
        Some(path) => {
            let mut raw = path.as_os_str().to_os_string();
            raw.push(".");
            raw.push(APP_EXTENSION);
            PathBuf::from(raw)
        }
        None => PathBuf::from(format!("{}.{}", name, APP_EXTENSION)),
    }
}
