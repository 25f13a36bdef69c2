//! Validate command implementation

use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Args;
use retexto_core::{FragmenterConfig, LanguageConfig, PunctuationReconstructor};
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Configuration file to validate
    #[arg(short = 'c', long = "config", value_name = "FILE", required = true)]
    pub config: PathBuf,

    /// Kind of configuration (default: detected from its contents)
    #[arg(short, long, value_enum)]
    pub kind: Option<ConfigKind>,
}

/// The configuration files `retexto` understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigKind {
    /// Language rules: terminators, abbreviations, punctuation markers
    Language,
    /// Tier table and overlap on their own
    Fragmenter,
    /// Full `retexto` configuration file
    Retexto,
}

impl ConfigKind {
    /// Guess the kind from the top-level tables of a TOML document
    pub fn detect(table: &toml::Table) -> Self {
        if table.contains_key("metadata") {
            ConfigKind::Language
        } else if table.contains_key("tiers") {
            ConfigKind::Fragmenter
        } else {
            ConfigKind::Retexto
        }
    }
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating configuration: {}", self.config.display());

        let content = std::fs::read_to_string(&self.config)
            .with_context(|| format!("Failed to read {}", self.config.display()))?;

        match self.check(&content) {
            Ok(details) => {
                println!("✓ Configuration is valid!");
                for line in details {
                    println!("  {line}");
                }
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e:#}");
                Err(e.context("Validation failed"))
            }
        }
    }

    /// Validate `content`, returning a summary of what it configures
    fn check(&self, content: &str) -> Result<Vec<String>> {
        let kind = match self.kind {
            Some(kind) => kind,
            None => ConfigKind::detect(&toml::from_str::<toml::Table>(content)?),
        };

        match kind {
            ConfigKind::Language => {
                let config = LanguageConfig::from_toml_str(content)?;
                let reconstructor = PunctuationReconstructor::from_config(&config)?;
                Ok(vec![
                    "Kind: language".to_string(),
                    format!("Language code: {}", config.metadata.code),
                    format!("Language name: {}", config.metadata.name),
                    format!("Abbreviations: {}", config.abbreviations.all().count()),
                    format!("Punctuation rules: {}", reconstructor.pipeline().len()),
                ])
            }
            ConfigKind::Fragmenter => {
                let config = FragmenterConfig::from_toml_str(content)?;
                Ok(vec![
                    "Kind: fragmenter".to_string(),
                    format!("Tiers: {}", config.tiers.len()),
                    format!("Overlap: {}", config.overlap),
                ])
            }
            ConfigKind::Retexto => {
                let config = CliConfig::from_toml_str(content)?;
                Ok(vec![
                    "Kind: retexto".to_string(),
                    format!("Estimator: {}", config.estimator.as_str()),
                    format!("Tiers: {}", config.fragmenter.tiers.len()),
                    format!("Overlap: {}", config.fragmenter.overlap),
                    format!("Language: {}", config.processing.language),
                ])
            }
        }
    }
}
