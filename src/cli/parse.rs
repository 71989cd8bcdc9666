//! CLI parse: clap types for platypus. No behavior; definitions only.
//!
//! The profile options come from the descriptor table and are attached to the
//! derived [`Cli`] at build time, so both read from the same `ArgMatches`.

use crate::options::profile_args;
use clap::{ArgMatches, Command, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// platypus - create macOS application bundles from scripts
#[derive(Parser, Debug)]
#[command(name = "platypus")]
#[command(about = "Create application bundles that run scripts")]
#[command(args_override_self = true, disable_version_flag = true)]
pub struct Cli {
    /// Script the application runs
    pub script: Option<PathBuf>,

    /// Destination bundle path (defaults to <Name>.app)
    pub destination: Option<PathBuf>,

    /// Write the profile to PATH instead of creating an app ("-" for stdout)
    #[arg(short = 'O', long = "generate-profile", value_name = "PATH", allow_hyphen_values = true)]
    pub generate_profile: Option<String>,

    /// Load settings from a saved profile before applying other options
    #[arg(short = 'P', long = "load-profile", value_name = "PROFILE")]
    pub load_profile: Option<PathBuf>,

    /// Print the program version and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Disable logging
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Parsed command line: the typed CLI plus the raw matches profile options are read from
#[derive(Debug)]
pub struct ParsedCommand {
    pub cli: Cli,
    pub matches: ArgMatches,
}

/// Full command: the derived flags plus every profile option
pub fn build_command() -> Command {
    Cli::command().args(profile_args())
}

pub fn parse_args<I, T>(args: I) -> Result<ParsedCommand, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command().try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches)?;
    Ok(ParsedCommand { cli, matches })
}
