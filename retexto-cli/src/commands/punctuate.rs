//! Punctuate command implementation

use super::init_logging;
use crate::config::CliConfig;
use crate::input::{resolve_patterns, FileReader};
use crate::language_source::LanguageSource;
use crate::output::{open_output, OutputFormat, Segment};
use crate::progress::ProgressReporter;
use anyhow::Result;
use clap::Args;
use rayon::prelude::*;
use std::path::PathBuf;

/// Arguments for the punctuate command
#[derive(Debug, Args)]
pub struct PunctuateArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: from the config file, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Embedded language code or name
    #[arg(short, long, value_name = "CODE", env = "RETEXTO_LANGUAGE")]
    pub language: Option<String>,

    /// External language configuration file
    #[arg(long, value_name = "FILE", conflicts_with = "language")]
    pub language_config: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "RETEXTO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl PunctuateArgs {
    /// Execute the punctuate command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        log::debug!("Arguments: {self:?}");

        let config = CliConfig::load(self.config.as_deref())?;
        let format = match self.format {
            Some(format) => format,
            None => config.default_format()?,
        };

        let language = self
            .language
            .as_deref()
            .unwrap_or(&config.processing.language);
        let source = LanguageSource::from_args(language, self.language_config.as_deref());
        let reconstructor = source.reconstructor()?;
        log::info!("Using language rules: {}", source.display_name());

        let files = resolve_patterns(&self.input)?;
        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(files.len() as u64);

        let results: Vec<Result<Vec<String>>> = files
            .par_iter()
            .map(|path| {
                let text = FileReader::read_text(path)?;
                let sentences = reconstructor.sentences(&text);
                progress.file_completed(&path.display().to_string());
                Ok(sentences)
            })
            .collect();
        progress.finish();

        let label_sources = files.len() > 1;
        let mut formatter = format.formatter(open_output(self.output.as_deref())?);
        for (path, result) in files.iter().zip(results) {
            let sentences = result?;
            let source = path.display().to_string();

            // Offsets refer to the reconstructed text, sentences joined by one space
            let mut offset = 0;
            for sentence in &sentences {
                formatter.format_segment(&Segment {
                    source: label_sources.then_some(source.as_str()),
                    ..Segment::plain(sentence, offset)
                })?;
                offset += sentence.len() + 1;
            }
            log::debug!("{}: {} sentence(s)", path.display(), sentences.len());
        }
        formatter.finish()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(input: &std::path::Path, output: PathBuf, format: OutputFormat) -> PunctuateArgs {
        PunctuateArgs {
            input: vec![input.to_string_lossy().into_owned()],
            output: Some(output),
            format: Some(format),
            language: Some("es".to_string()),
            language_config: None,
            config: None,
            quiet: true,
            verbose: 0,
        }
    }

    #[test]
    fn test_punctuate_text_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("dictado.txt");
        let output = dir.path().join("salida.txt");
        fs::write(&input, "hola como estas yo bien y tu").unwrap();

        args(&input, output.clone(), OutputFormat::Text)
            .execute()
            .unwrap();

        assert_eq!(
            fs::read_to_string(output).unwrap(),
            "Hola como estas yo bien y tu.\n"
        );
    }

    #[test]
    fn test_punctuate_json_offsets() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("dictado.txt");
        let output = dir.path().join("salida.json");
        fs::write(&input, "llegamos tarde. nadie esperaba").unwrap();

        args(&input, output.clone(), OutputFormat::Json)
            .execute()
            .unwrap();

        let parsed: Vec<crate::output::SegmentData> =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].text, "Llegamos tarde.");
        assert_eq!(parsed[1].text, "Nadie esperaba.");
        assert_eq!(parsed[1].offset, "Llegamos tarde. ".len());
    }

    #[test]
    fn test_unknown_language() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("dictado.txt");
        fs::write(&input, "hola").unwrap();

        let mut args = args(&input, dir.path().join("out.txt"), OutputFormat::Text);
        args.language = Some("xx".to_string());
        assert!(args.execute().is_err());
    }
}
