//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{PlatypusError, ProfileError};

/// Map domain errors to a string for CLI output.
///
/// Option errors carry a usage hint; everything else is the error's own message.
pub fn map_error(e: &PlatypusError) -> String {
    match e {
        PlatypusError::Profile(ProfileError::UnknownOption(_))
        | PlatypusError::Profile(ProfileError::MissingArgument(_)) => {
            format!("platypus: {}\nTry 'platypus --help' for more information.", e)
        }
        _ => format!("platypus: {}", e),
    }
}
