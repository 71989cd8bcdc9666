//! Integration tests for the platypus compiler and launcher binaries

mod bundle_layout;
mod config_integration;
mod launcher_args;
mod overwrite;
mod profile_emission;
pub mod test_utils;
