//! Layered configuration for the pipeline commands.
//!
//! Values are resolved in the order: command-line flag, `--set KEY=VALUE`,
//! configuration file, built-in defaults.

pub mod builder;
pub mod defaults;
pub mod file;

pub use builder::build_config;
