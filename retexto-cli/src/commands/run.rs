//! Run command implementation

use super::{init_logging, EstimatorArg};
use crate::config::{CliConfig, OnFailure, ProcessingConfig};
use crate::error::CliError;
use crate::input::FileReader;
use crate::language_source::LanguageSource;
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use retexto_core::OverlapPolicy;
use retexto_engine::{
    ExecutionMode, FragmentProcessor, IdentityProcessor, PunctuationProcessor,
    RewritePipelineBuilder, RunOutput,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the run command
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Input file, or `-` for stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also write the result as texto_procesado.txt in this directory
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Processor applied to each fragment
    #[arg(short, long, value_enum, default_value = "punctuate")]
    pub processor: ProcessorKind,

    /// Embedded language code or name for the punctuate processor
    #[arg(short, long, value_name = "CODE", env = "RETEXTO_LANGUAGE")]
    pub language: Option<String>,

    /// External language configuration file
    #[arg(long, value_name = "FILE", conflicts_with = "language")]
    pub language_config: Option<PathBuf>,

    /// Length estimator used to size fragments
    #[arg(short, long, value_enum)]
    pub estimator: Option<EstimatorArg>,

    /// Split every document into fragments of this size, ignoring tiers
    #[arg(short = 's', long, value_name = "UNITS")]
    pub fragment_size: Option<usize>,

    /// Context shared between consecutive fragments, in estimator units
    #[arg(long, value_name = "UNITS")]
    pub overlap: Option<usize>,

    /// Maximum processor calls in flight (default: number of CPUs)
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Per-call timeout in milliseconds, 0 to disable
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Retries after a transient failure
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Minimum delay between call starts in milliseconds
    #[arg(long, value_name = "MS")]
    pub pacing_ms: Option<u64>,

    /// What to do once a fragment has exhausted its retries
    #[arg(long, value_enum)]
    pub on_failure: Option<OnFailure>,

    /// Force an execution mode instead of choosing one per document
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Keep the text shared by consecutive fragments instead of removing it
    #[arg(long)]
    pub keep_overlap: bool,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "RETEXTO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress progress output and the run summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Local processors available from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProcessorKind {
    /// Rule-based punctuation reconstruction
    Punctuate,
    /// Return every fragment unchanged
    Identity,
}

/// Execution modes selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    /// One fragment at a time
    Sequential,
    /// Bounded concurrency
    Concurrent,
}

impl From<ModeArg> for ExecutionMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Sequential => ExecutionMode::Sequential,
            ModeArg::Concurrent => ExecutionMode::Concurrent,
        }
    }
}

impl RunArgs {
    /// Execute the run command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        log::debug!("Arguments: {self:?}");

        let config = CliConfig::load(self.config.as_deref())?;
        let processing = self.processing_config(&config);
        let processor = self.processor(&processing)?;

        let mut builder = RewritePipelineBuilder::from_shared(processor)
            .estimator_kind(self.estimator.map_or(config.estimator, Into::into))
            .fragmenter_config(config.fragmenter_config(self.fragment_size, self.overlap)?)
            .policy(processing.policy())
            .overlap_policy(if self.keep_overlap {
                OverlapPolicy::Keep
            } else {
                config.overlap_policy
            });
        if let Some(mode) = self.mode {
            builder = builder.execution_mode(mode.into());
        }
        let pipeline = builder
            .build()
            .map_err(|e| CliError::ConfigError(e.to_string()))?;
        log::debug!("Pipeline: {pipeline:?}");

        let input = FileReader::open_input(&self.input)?;

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_spinner("Rewriting fragments");
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to start the async runtime")?;
        let result = runtime.block_on(pipeline.run(input));
        progress.finish();

        let output = result.map_err(|e| CliError::ProcessingError(e.to_string()))?;
        self.write_output(&output)?;
        self.report(&output);

        Ok(())
    }

    /// Config file values with command-line overrides applied
    fn processing_config(&self, config: &CliConfig) -> ProcessingConfig {
        let mut processing = config.processing.clone();
        if let Some(language) = &self.language {
            processing.language = language.clone();
        }
        if let Some(concurrency) = self.concurrency {
            processing.concurrency = concurrency;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            processing.timeout_ms = timeout_ms;
        }
        if let Some(retries) = self.retries {
            processing.retries = retries;
        }
        if let Some(pacing_ms) = self.pacing_ms {
            processing.pacing_ms = pacing_ms;
        }
        if let Some(on_failure) = self.on_failure {
            processing.on_failure = on_failure;
        }
        processing
    }

    fn processor(&self, processing: &ProcessingConfig) -> Result<Arc<dyn FragmentProcessor>> {
        Ok(match self.processor {
            ProcessorKind::Identity => Arc::new(IdentityProcessor),
            ProcessorKind::Punctuate => {
                let source = LanguageSource::from_args(
                    &processing.language,
                    self.language_config.as_deref(),
                );
                log::info!("Using language rules: {}", source.display_name());
                Arc::new(PunctuationProcessor::new(source.reconstructor()?))
            }
        })
    }

    fn write_output(&self, output: &RunOutput) -> Result<()> {
        match &self.output {
            Some(path) => std::fs::write(path, &output.text)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?,
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", output.text)?;
                stdout.flush()?;
            }
        }

        if let Some(dir) = &self.output_dir {
            let path = output
                .artifact()
                .write_to_dir(dir)
                .with_context(|| format!("Failed to write artifact into {}", dir.display()))?;
            log::info!("Artifact written to {}", path.display());
        }

        Ok(())
    }

    fn report(&self, output: &RunOutput) {
        let metadata = &output.metadata;
        if !output.is_complete() {
            log::warn!(
                "{} fragment(s) kept their original text: {:?}",
                output.fallbacks.len(),
                output.fallbacks
            );
        }

        if self.quiet {
            return;
        }

        let status = if output.is_complete() { "✓" } else { "⚠" };
        eprintln!(
            "{status} {} fragment(s), {} call(s), {} fallback(s), {} mode, {:.1} ms",
            metadata.fragment_count,
            metadata.attempts,
            output.fallbacks.len(),
            metadata.execution_mode.as_str(),
            metadata.processing_time_ms
        );
        if let Some(dir) = &self.output_dir {
            eprintln!("  Artifact: {}", dir.join(retexto_engine::ARTIFACT_FILE_NAME).display());
        }
    }
}
