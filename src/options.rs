//! Option Parser
//!
//! Maps command line flags onto profile fields through one static descriptor table.
//! The parser only records values; file existence is checked by profile validation.

mod apply;
mod table;

pub use apply::{apply_matches, profile_args, profile_error_from_clap, AppliedOptions};
pub use table::{descriptor_for_flag, OptionAction, OptionDescriptor, PROFILE_OPTIONS};
