//! Configuration file for the `retexto` binary
//!
//! Every section is optional; missing values fall back to the library
//! defaults. Command-line flags override whatever the file sets.

use crate::error::CliError;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use retexto_core::language::DEFAULT_LANGUAGE;
use retexto_core::{EstimatorKind, FragmenterConfig, OverlapPolicy};
use retexto_engine::{FailurePolicy, ProcessingPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// CLI configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Estimator used to size fragments
    #[serde(default)]
    pub estimator: EstimatorKind,

    /// How overlapping text is treated on reassembly
    #[serde(default)]
    pub overlap_policy: OverlapPolicy,

    /// Size tiers and overlap
    #[serde(default)]
    pub fragmenter: FragmenterConfig,

    /// Processing configuration
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// What `run` does once a fragment has exhausted its retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OnFailure {
    /// Stop the run with an error
    Abort,
    /// Keep the fragment's original text
    #[default]
    Substitute,
}

impl From<OnFailure> for FailurePolicy {
    fn from(value: OnFailure) -> Self {
        match value {
            OnFailure::Abort => FailurePolicy::Abort,
            OnFailure::Substitute => FailurePolicy::SubstituteOriginal,
        }
    }
}

/// Processing-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Default language for punctuation
    pub language: String,

    /// Calls in flight; 0 means one per CPU
    pub concurrency: usize,

    /// Per-call timeout in milliseconds; 0 disables it
    pub timeout_ms: u64,

    /// Retries after the first attempt
    pub retries: u32,

    /// Base backoff between retries in milliseconds
    pub backoff_ms: u64,

    /// Minimum spacing between call starts in milliseconds
    pub pacing_ms: u64,

    /// Failure handling
    pub on_failure: OnFailure,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        let policy = ProcessingPolicy::default();
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            concurrency: 0,
            timeout_ms: policy.timeout.map_or(0, |t| t.as_millis() as u64),
            retries: policy.max_retries,
            backoff_ms: policy.base_backoff.as_millis() as u64,
            pacing_ms: 0,
            on_failure: OnFailure::default(),
        }
    }
}

impl ProcessingConfig {
    /// Engine policy for these settings
    pub fn policy(&self) -> ProcessingPolicy {
        let concurrency = match self.concurrency {
            0 => num_cpus::get(),
            n => n,
        };

        ProcessingPolicy::default()
            .with_failure(self.on_failure.into())
            .with_retries(self.retries)
            .with_backoff(Duration::from_millis(self.backoff_ms))
            .with_timeout(non_zero_millis(self.timeout_ms))
            .with_pacing(non_zero_millis(self.pacing_ms))
            .with_concurrency(concurrency)
    }
}

fn non_zero_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Output-related configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format for `split` and `punctuate`
    pub default_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Text.as_str().to_string(),
        }
    }
}

impl CliConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| CliError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, or the defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check tiers, policy and output settings together
    pub fn validate(&self) -> Result<()> {
        self.fragmenter
            .validate()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        self.processing
            .policy()
            .validate()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        self.default_format()?;
        Ok(())
    }

    /// The configured default output format
    pub fn default_format(&self) -> Result<OutputFormat> {
        self.output
            .default_format
            .parse()
            .map_err(|e: String| CliError::ConfigError(e).into())
    }

    /// Fragmenter configuration with command-line overrides applied.
    ///
    /// An explicit fragment size replaces the tier table with a single tier
    /// that splits documents of any size.
    pub fn fragmenter_config(
        &self,
        fragment_size: Option<usize>,
        overlap: Option<usize>,
    ) -> Result<FragmenterConfig> {
        let overlap = overlap.unwrap_or(self.fragmenter.overlap);
        let config = match fragment_size {
            Some(size) => FragmenterConfig::uniform(0, size, overlap),
            None => FragmenterConfig::new(self.fragmenter.tiers.clone(), overlap),
        };
        config.map_err(|e| CliError::ConfigError(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = CliConfig::from_toml_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.estimator, EstimatorKind::Tokens);
        assert_eq!(config.overlap_policy, OverlapPolicy::Trim);
        assert_eq!(config.processing.language, "es");
        assert_eq!(config.default_format().unwrap(), OutputFormat::Text);
    }

    #[test]
    fn test_full_document() {
        let config = CliConfig::from_toml_str(
            r#"
estimator = "words"
overlap_policy = "trim-fallback"

[fragmenter]
overlap = 5

[[fragmenter.tiers]]
threshold_low = 100
fragment_size = 40

[processing]
language = "en"
concurrency = 3
timeout_ms = 0
retries = 1
pacing_ms = 250
on_failure = "abort"

[output]
default_format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.estimator, EstimatorKind::Words);
        assert_eq!(config.overlap_policy, OverlapPolicy::TrimFallback);
        assert_eq!(config.fragmenter.tiers.len(), 1);
        assert_eq!(config.default_format().unwrap(), OutputFormat::Json);

        let policy = config.processing.policy();
        assert_eq!(policy.concurrency, 3);
        assert_eq!(policy.timeout, None);
        assert_eq!(policy.max_retries, 1);
        assert_eq!(policy.pacing, Some(Duration::from_millis(250)));
        assert_eq!(policy.failure, FailurePolicy::Abort);
    }

    #[test]
    fn test_zero_concurrency_means_cpu_count() {
        let policy = ProcessingConfig::default().policy();
        assert_eq!(policy.concurrency, num_cpus::get());
        assert_eq!(policy.failure, FailurePolicy::SubstituteOriginal);
    }

    #[test]
    fn test_invalid_tiers_rejected() {
        let err = CliConfig::from_toml_str(
            r#"
[fragmenter]
overlap = 50

[[fragmenter.tiers]]
threshold_low = 0
fragment_size = 10
"#,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = CliConfig::from_toml_str("[output]\ndefault_format = \"yaml\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_fragment_size_override() {
        let config = CliConfig::default();

        let uniform = config.fragmenter_config(Some(200), Some(10)).unwrap();
        assert_eq!(uniform.tiers.len(), 1);
        assert_eq!(uniform.tiers[0].fragment_size, 200);
        assert_eq!(uniform.overlap, 10);

        let tiers = config.fragmenter_config(None, None).unwrap();
        assert_eq!(tiers, FragmenterConfig::default());

        assert!(config.fragmenter_config(Some(5), Some(5)).is_err());
    }

    #[test]
    fn test_load_without_path() {
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }
}
