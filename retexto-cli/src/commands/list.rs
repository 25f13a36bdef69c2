//! List command implementation

use super::ListCommands;
use crate::output::OutputFormat;
use anyhow::Result;
use retexto_core::language::{get_config, list_languages, DEFAULT_LANGUAGE};
use retexto_core::EstimatorKind;

impl ListCommands {
    /// Print the requested component list to stdout
    pub fn execute(&self) -> Result<()> {
        for line in self.lines()? {
            println!("{line}");
        }
        Ok(())
    }

    fn lines(&self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        match self {
            ListCommands::Languages => {
                lines.push("Embedded languages:".to_string());
                for code in list_languages() {
                    let config = get_config(code)?;
                    let marker = if code == DEFAULT_LANGUAGE { " (default)" } else { "" };
                    lines.push(format!("  {code:<4} {}{marker}", config.metadata.name));
                }
                lines.push(String::new());
                lines.push("Other languages load from a TOML file via --language-config.".to_string());
            }
            ListCommands::Formats => {
                lines.push("Output formats:".to_string());
                for format in OutputFormat::ALL {
                    lines.push(format!("  {:<10} {}", format.as_str(), format.description()));
                }
            }
            ListCommands::Estimators => {
                lines.push("Length estimators:".to_string());
                for kind in EstimatorKind::ALL {
                    let marker = if kind == EstimatorKind::default() { " (default)" } else { "" };
                    lines.push(format!(
                        "  {:<8} {}{marker}",
                        kind.as_str(),
                        estimator_description(kind)
                    ));
                }
            }
        }
        Ok(lines)
    }
}

fn estimator_description(kind: EstimatorKind) -> &'static str {
    match kind {
        EstimatorKind::Words => "Whitespace-separated words",
        EstimatorKind::Chars => "Unicode characters",
        EstimatorKind::Tokens => "Approximate model tokens, counted per word",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_languages_listed_with_default() {
        let lines = ListCommands::Languages.lines().unwrap();
        assert!(lines.iter().any(|l| l.contains("es") && l.contains("(default)")));
        assert!(lines.iter().any(|l| l.trim_start().starts_with("en")));
    }

    #[test]
    fn test_formats_listed() {
        let lines = ListCommands::Formats.lines().unwrap();
        assert_eq!(lines.len(), 1 + OutputFormat::ALL.len());
        assert!(lines.iter().any(|l| l.contains("markdown")));
    }

    #[test]
    fn test_estimators_listed() {
        let lines = ListCommands::Estimators.lines().unwrap();
        assert!(lines.iter().any(|l| l.contains("tokens") && l.contains("(default)")));
        assert!(lines.iter().any(|l| l.contains("words")));
    }
}
