//! CLI domain: parse, route, and output only.
//! Profile building and bundle creation live in their own domains.

mod output;
mod parse;
mod route;

pub use output::map_error;
pub use parse::{build_command, parse_args, Cli, ParsedCommand};
pub use route::{destination_for, Outcome, RunContext};
