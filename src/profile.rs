//! Profile Model & Validator
//!
//! The profile is the canonical configuration for a bundle: identity, execution,
//! interface, resources and packaging settings. It starts from defaults, is mutated
//! field-by-field by the option parser, and is frozen once by [`Profile::finalize`]
//! before materialization.

mod defaults;
mod field;
mod model;
mod serialize;
mod validate;

pub use defaults::{
    bundle_identifier, login_user, ProfileDefaults, DEFAULT_APP_NAME, DEFAULT_INTERPRETER,
    DEFAULT_VERSION,
};
pub use field::{Field, FieldGroup, ValueKind};
pub use model::{split_list, InterfaceType, Profile, StatusItemDisplayType, LIST_DELIMITER};
pub use serialize::{encode_dictionary, PlistFormat, STDOUT_TARGET};
pub use validate::{is_hex_color, is_valid_identifier, ValidatedProfile};
