//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use retexto_core::defaults;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Which template to write
    #[arg(short, long, value_enum, default_value = "retexto")]
    pub kind: TemplateKind,

    /// Language code for a language template
    #[arg(short = 'l', long, value_name = "CODE", default_value = "xx")]
    pub language_code: String,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Templates the command can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TemplateKind {
    /// `retexto` configuration: estimator, tiers, processing, output
    Retexto,
    /// Language rules for punctuation reconstruction
    Language,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        if self.output.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                self.output.display()
            );
        }

        println!("Generating configuration template...");
        println!("  Kind: {:?}", self.kind);
        println!("  Output file: {}", self.output.display());

        let template = match self.kind {
            TemplateKind::Retexto => retexto_template(),
            TemplateKind::Language => language_template(&self.language_code),
        };

        std::fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the configuration file");
        println!("2. Validate your configuration:");
        println!("   retexto validate -c {}", self.output.display());
        println!("3. Use it:");
        match self.kind {
            TemplateKind::Retexto => {
                println!("   retexto run -i input.txt -c {}", self.output.display())
            }
            TemplateKind::Language => println!(
                "   retexto punctuate -i input.txt --language-config {}",
                self.output.display()
            ),
        }

        Ok(())
    }
}

fn retexto_template() -> String {
    format!(
        r#"# retexto configuration
#
# Every section is optional. Command-line flags override these values.

# Length estimator: "words", "chars" or "tokens"
estimator = "tokens"

# Overlap on reassembly: "trim" removes the text consecutive fragments
# share, "keep" leaves it, "trim-fallback" removes it only next to
# fragments that kept their original text
overlap_policy = "trim"

[fragmenter]
# Context shared between consecutive fragments, in estimator units
overlap = {overlap}

# Tiers must be contiguous; documents below the first threshold are not split
# and sizes past the last threshold use the last tier.
[[fragmenter.tiers]]
threshold_low = {min}
threshold_high = {small}
fragment_size = 1000

[[fragmenter.tiers]]
threshold_low = {small}
threshold_high = {medium}
fragment_size = 2000

[[fragmenter.tiers]]
threshold_low = {medium}
fragment_size = 3000

[processing]
# Language for the punctuate processor
language = "es"
# Calls in flight; 0 means one per CPU
concurrency = 0
# Per-call timeout; 0 disables it
timeout_ms = 60000
# Retries after a transient failure, with exponential backoff
retries = 2
backoff_ms = 100
# Minimum spacing between call starts
pacing_ms = 0
# "substitute" keeps a failed fragment's original text, "abort" stops the run
on_failure = "substitute"

[output]
# "text", "json" or "markdown"
default_format = "text"
"#,
        overlap = defaults::OVERLAP,
        min = defaults::MIN_SPLIT_SIZE,
        small = defaults::SMALL_DOCUMENT,
        medium = defaults::MEDIUM_DOCUMENT,
    )
}

fn language_template(code: &str) -> String {
    format!(
        r#"# Language configuration for {code}

[metadata]
code = "{code}"
name = "Custom Language"

# Characters that end a sentence
[terminators]
chars = [".", "!", "?", "…"]

# Abbreviations organized by category; category names are arbitrary.
# A period after one of these does not end the sentence.
[abbreviations]
titles = ["Dr", "Prof"]
common = ["etc"]

[punctuation]
# Words and phrases that get a comma before them, in order
discourse_markers = []
# Relative-clause markers that get a comma before them
relative_markers = []
# Words that open an enumerated item after a bare number ("1 first ...")
list_head_words = []

# Regex substitutions applied after the rules above, in order
[[punctuation.substitutions]]
name = "space-before-punctuation"
pattern = '\s+([,;:.!?])'
replacement = '$1'

[[punctuation.substitutions]]
name = "repeated-commas"
pattern = ',(\s*,)+'
replacement = ','
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use retexto_core::{FragmenterConfig, LanguageConfig, PunctuationReconstructor};
    use tempfile::TempDir;

    fn args(output: PathBuf, kind: TemplateKind) -> GenerateConfigArgs {
        GenerateConfigArgs {
            output,
            kind,
            language_code: "gl".to_string(),
            force: false,
        }
    }

    #[test]
    fn test_retexto_template_matches_defaults() {
        let config = CliConfig::from_toml_str(&retexto_template()).unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.fragmenter, FragmenterConfig::default());
    }

    #[test]
    fn test_language_template_is_valid() {
        let config = LanguageConfig::from_toml_str(&language_template("gl")).unwrap();
        assert_eq!(config.metadata.code, "gl");

        let reconstructor = PunctuationReconstructor::from_config(&config).unwrap();
        assert_eq!(reconstructor.reconstruct("ola mundo ."), "Ola mundo.");
    }

    #[test]
    fn test_execute_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("gl.toml");

        args(output_path.clone(), TemplateKind::Language)
            .execute()
            .unwrap();

        let content = std::fs::read_to_string(&output_path).unwrap();
        assert!(content.contains("code = \"gl\""));
    }

    #[test]
    fn test_existing_file_needs_force() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("retexto.toml");
        std::fs::write(&output_path, "keep me").unwrap();

        let mut args = args(output_path.clone(), TemplateKind::Retexto);
        assert!(args.execute().is_err());
        assert_eq!(std::fs::read_to_string(&output_path).unwrap(), "keep me");

        args.force = true;
        args.execute().unwrap();
        assert!(CliConfig::load(Some(output_path.as_path())).is_ok());
    }
}
