//! Platypus: Script Application Bundler
//!
//! Compiles a script plus a declarative profile into a self-contained application
//! bundle, and provides the launcher runtime that runs inside every bundle.

pub mod bundle;
pub mod cli;
pub mod config;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod options;
pub mod profile;
pub mod script;
