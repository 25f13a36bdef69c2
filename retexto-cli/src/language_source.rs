//! Where a command gets its language rules from

use anyhow::{Context, Result};
use retexto_core::language::DEFAULT_LANGUAGE;
use retexto_core::{LanguageConfig, PunctuationReconstructor};
use std::path::{Path, PathBuf};

/// Source of language rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageSource {
    /// Embedded language, by code or name
    BuiltIn(String),
    /// External TOML configuration file
    External(PathBuf),
}

impl Default for LanguageSource {
    fn default() -> Self {
        LanguageSource::BuiltIn(DEFAULT_LANGUAGE.to_string())
    }
}

impl LanguageSource {
    /// An external file wins over a language code
    pub fn from_args(language: &str, language_config: Option<&Path>) -> Self {
        match language_config {
            Some(path) => LanguageSource::External(path.to_path_buf()),
            None => LanguageSource::BuiltIn(language.to_string()),
        }
    }

    /// Get the display name for the language source
    pub fn display_name(&self) -> String {
        match self {
            LanguageSource::BuiltIn(code) => format!("Built-in: {code}"),
            LanguageSource::External(path) => format!("External: {}", path.display()),
        }
    }

    /// Build the reconstructor these rules describe
    pub fn reconstructor(&self) -> Result<PunctuationReconstructor> {
        match self {
            LanguageSource::BuiltIn(code) => PunctuationReconstructor::for_language(code)
                .with_context(|| format!("Failed to load language '{code}'")),
            LanguageSource::External(path) => {
                let config = LanguageConfig::from_file(path).with_context(|| {
                    format!("Failed to load language config: {}", path.display())
                })?;
                PunctuationReconstructor::from_config(&config).with_context(|| {
                    format!("Invalid punctuation rules in {}", path.display())
                })
            }
        }
    }
}
