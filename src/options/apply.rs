//! Bridge between the descriptor table, clap, and the profile model.

use crate::error::ProfileError;
use crate::options::table::{descriptor_for_flag, OptionAction, OptionDescriptor, PROFILE_OPTIONS};
use crate::profile::{Field, Profile, ValueKind};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches};
use std::collections::HashSet;

/// clap arguments generated from the descriptor table
pub fn profile_args() -> Vec<Arg> {
    PROFILE_OPTIONS.iter().map(arg_for).collect()
}

fn arg_for(d: &'static OptionDescriptor) -> Arg {
    let arg = Arg::new(d.long).short(d.short).long(d.long).help(d.help);
    match d.action {
        OptionAction::SetTrue | OptionAction::SetFalse => arg.action(ArgAction::SetTrue),
        OptionAction::Value => {
            let action = if d.value_kind() == Some(ValueKind::List) {
                ArgAction::Append
            } else {
                ArgAction::Set
            };
            arg.action(action)
                .num_args(1)
                .value_name(d.value_name())
                .allow_hyphen_values(true)
        }
    }
}

/// Fields explicitly set on the command line
#[derive(Debug, Default, Clone)]
pub struct AppliedOptions {
    explicit: HashSet<Field>,
}

impl AppliedOptions {
    pub fn is_explicit(&self, field: Field) -> bool {
        self.explicit.contains(&field)
    }
}

fn given_on_command_line(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Apply every profile option present in `matches` onto `profile`.
///
/// Options are applied in table order; path-valued options only record the path.
pub fn apply_matches(profile: &mut Profile, matches: &ArgMatches) -> Result<AppliedOptions, ProfileError> {
    let mut applied = AppliedOptions::default();

    for d in PROFILE_OPTIONS {
        if !given_on_command_line(matches, d.long) {
            continue;
        }
        match d.action {
            OptionAction::SetTrue | OptionAction::SetFalse => {
                if !matches.get_flag(d.long) {
                    continue;
                }
                let value = d.action == OptionAction::SetTrue;
                for field in d.fields {
                    profile.set_flag(*field, value)?;
                }
            }
            OptionAction::Value => {
                let values = matches
                    .get_many::<String>(d.long)
                    .ok_or_else(|| ProfileError::MissingArgument(format!("-{}", d.short)))?;
                for raw in values {
                    for field in d.fields {
                        profile.set_field(*field, raw)?;
                    }
                }
            }
        }
        applied.explicit.extend(d.fields.iter().copied());
    }

    Ok(applied)
}

fn flag_from_context(err: &clap::Error) -> String {
    let raw = match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(s)) => s.clone(),
        _ => String::new(),
    };
    // clap renders value-taking args as "--name <VALUE>"
    let token = raw.split_whitespace().next().unwrap_or_default().to_string();
    match descriptor_for_flag(&token) {
        Some(d) => format!("-{}", d.short),
        None => token,
    }
}

/// Map a clap parse failure onto the option parser's error taxonomy.
///
/// Returns `None` for errors that are not option errors (help, version, usage).
pub fn profile_error_from_clap(err: &clap::Error) -> Option<ProfileError> {
    match err.kind() {
        ErrorKind::UnknownArgument => Some(ProfileError::UnknownOption(flag_from_context(err))),
        ErrorKind::InvalidValue
        | ErrorKind::NoEquals
        | ErrorKind::TooFewValues
        | ErrorKind::WrongNumberOfValues => Some(ProfileError::MissingArgument(flag_from_context(err))),
        _ => None,
    }
}
