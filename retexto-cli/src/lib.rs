//! retexto CLI library
//!
//! This library provides the command-line interface for the retexto
//! fragmentation and rewriting system.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod language_source;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
