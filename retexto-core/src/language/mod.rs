//! Language-specific data for sentence splitting and punctuation repair
//!
//! Each language is a TOML document: terminators, abbreviations and the
//! marker lists that drive the punctuation rule pipeline. Spanish and
//! English are embedded; other languages load from files at runtime.

pub mod config;
pub mod loader;

pub use config::{Abbreviations, LanguageConfig, Metadata, Punctuation, Substitution, Terminators};
pub use loader::{get_config, list_languages, DEFAULT_LANGUAGE};
