//! Configuration structures and validation
//!
//! This module defines the TOML schema for language configuration.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Root language configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub metadata: Metadata,
    pub terminators: Terminators,
    #[serde(default)]
    pub abbreviations: Abbreviations,
    #[serde(default)]
    pub punctuation: Punctuation,
}

/// Language metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub code: String,
    pub name: String,
}

/// Terminator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terminators {
    pub chars: Vec<char>,
}

/// Abbreviations grouped by arbitrary category names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Abbreviations {
    #[serde(flatten)]
    pub categories: BTreeMap<String, Vec<String>>,
}

impl Abbreviations {
    /// Every abbreviation across all categories
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.categories.values().flatten().map(String::as_str)
    }
}

/// Inputs to the punctuation rule pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Punctuation {
    /// Conjunctions, subordinators and transition phrases preceded by a
    /// comma, applied in order
    #[serde(default)]
    pub discourse_markers: Vec<String>,
    /// Relative-clause markers preceded by a comma
    #[serde(default)]
    pub relative_markers: Vec<String>,
    /// Words that, after a bare number, open an enumerated item
    #[serde(default)]
    pub list_head_words: Vec<String>,
    /// Extra regex substitutions applied after the built-in rules
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
}

/// A named regex search-and-replace step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substitution {
    pub name: String,
    pub pattern: String,
    pub replacement: String,
}

impl LanguageConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CoreError::config(format!("failed to parse language config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Structural checks that parsing alone does not enforce
    pub fn validate(&self) -> Result<()> {
        if self.metadata.code.trim().is_empty() {
            return Err(CoreError::config("metadata.code must not be empty"));
        }

        if self.terminators.chars.is_empty() {
            return Err(CoreError::config("terminators.chars must not be empty"));
        }

        let markers = self
            .punctuation
            .discourse_markers
            .iter()
            .chain(&self.punctuation.relative_markers)
            .chain(&self.punctuation.list_head_words);
        if markers.into_iter().any(|m| m.trim().is_empty()) {
            return Err(CoreError::config("punctuation markers must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_config_deserialize() {
        let toml_str = r#"
            [metadata]
            code = "es"
            name = "Spanish"

            [terminators]
            chars = [".", "!", "?"]

            [abbreviations]
            titles = ["Sr", "Sra"]
            common = ["etc"]

            [punctuation]
            discourse_markers = ["pero", "sin embargo"]
            relative_markers = ["cuyo"]

            [[punctuation.substitutions]]
            name = "ok"
            pattern = "\\bok\\b"
            replacement = "de acuerdo"
        "#;

        let config = LanguageConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.metadata.code, "es");
        assert_eq!(config.terminators.chars.len(), 3);
        assert_eq!(config.abbreviations.all().count(), 3);
        assert_eq!(config.punctuation.discourse_markers.len(), 2);
        assert!(config.punctuation.list_head_words.is_empty());
        assert_eq!(config.punctuation.substitutions[0].replacement, "de acuerdo");
    }

    #[test]
    fn test_rejects_empty_code() {
        let toml_str = r#"
            [metadata]
            code = ""
            name = "Nada"

            [terminators]
            chars = ["."]
        "#;

        assert!(LanguageConfig::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn test_rejects_blank_marker() {
        let toml_str = r#"
            [metadata]
            code = "xx"
            name = "Test"

            [terminators]
            chars = ["."]

            [punctuation]
            discourse_markers = [" "]
        "#;

        assert!(LanguageConfig::from_toml_str(toml_str).is_err());
    }
}
