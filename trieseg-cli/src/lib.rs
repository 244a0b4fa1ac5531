//! trieseg CLI library
//!
//! Subcommands, configuration loading and file handling behind the
//! `trieseg` binary.

pub mod commands;
pub mod config;
pub mod error;

pub use error::{CliError, CliResult};
