//! platypus CLI Binary
//!
//! Compiles a script and a set of options into an application bundle, or emits
//! the resulting profile with `-O`.

use platypus::cli::{map_error, parse_args, Cli, Outcome, RunContext};
use platypus::config::ConfigLoader;
use platypus::error::PlatypusError;
use platypus::logging::{init_logging, LoggingConfig};
use platypus::options::profile_error_from_clap;
use std::process;
use tracing::{error, info};

fn main() {
    let parsed = match parse_args(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(err) => match profile_error_from_clap(&err) {
            Some(option_error) => {
                let e = PlatypusError::from(option_error);
                eprintln!("{}", map_error(&e));
                process::exit(e.exit_code());
            }
            // help and usage errors render themselves
            None => err.exit(),
        },
    };

    let config = match ConfigLoader::load(parsed.cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(e.exit_code());
        }
    };

    let logging_config = build_logging_config(&parsed.cli, config.logging.clone());
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let context = RunContext::from_config(config);

    match context.execute(&parsed) {
        Ok(Outcome::Version(version)) => println!("{}", version),
        Ok(Outcome::ProfileWritten(target)) => info!(target = %target, "Profile written"),
        Ok(Outcome::BundleCreated(bundle)) => {
            info!(bundle = %bundle.root.display(), "Application created")
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(e.exit_code());
        }
    }
}

/// Build logging configuration from CLI args over the loaded config file section.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, mut config: LoggingConfig) -> LoggingConfig {
    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
        if config.output == "file" {
            config.output = "file+stderr".to_string();
        }
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
