//! Split command implementation

use super::{init_logging, EstimatorArg};
use crate::config::CliConfig;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{open_output, OutputFormat, Segment};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use rayon::prelude::*;
use retexto_core::{Fragment, Fragmenter};
use std::path::{Path, PathBuf};

/// Arguments for the split command
#[derive(Debug, Args)]
pub struct SplitArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: from the config file, else text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Length estimator used to size fragments
    #[arg(short, long, value_enum)]
    pub estimator: Option<EstimatorArg>,

    /// Split every document into fragments of this size, ignoring tiers
    #[arg(short = 's', long, value_name = "UNITS")]
    pub fragment_size: Option<usize>,

    /// Context shared between consecutive fragments, in estimator units
    #[arg(long, value_name = "UNITS")]
    pub overlap: Option<usize>,

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

/// One file and the fragments it was split into
struct SplitFile {
    path: PathBuf,
    text: String,
    fragments: Vec<Fragment>,
}

impl SplitArgs {
    /// Execute the split command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);
        log::debug!("Arguments: {self:?}");

        let config = CliConfig::load(self.config.as_deref())?;
        let format = match self.format {
            Some(format) => format,
            None => config.default_format()?,
        };
        let estimator = self.estimator.map_or(config.estimator, Into::into);
        let fragmenter = Fragmenter::from_shared(
            estimator.build(),
            config.fragmenter_config(self.fragment_size, self.overlap)?,
        )?;

        let files = resolve_patterns(&self.input)?;
        log::info!(
            "Splitting {} file(s) with the {} estimator",
            files.len(),
            estimator.as_str()
        );

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(files.len() as u64);

        let results: Vec<Result<SplitFile>> = files
            .par_iter()
            .map(|path| {
                let split = split_file(&fragmenter, path)?;
                progress.file_completed(&path.display().to_string());
                Ok(split)
            })
            .collect();
        progress.finish();

        let label_sources = files.len() > 1;
        let mut formatter = format.formatter(open_output(self.output.as_deref())?);
        let mut total = 0;
        for result in results {
            let file = result?;
            let source = file.path.display().to_string();
            for fragment in &file.fragments {
                formatter.format_segment(&Segment {
                    text: fragment.text(&file.text),
                    offset: fragment.start(),
                    overlap_bytes: fragment.overlap_bytes,
                    cut: Some(fragment.cut.as_str()),
                    source: label_sources.then_some(source.as_str()),
                })?;
            }
            total += file.fragments.len();
        }
        formatter.finish()?;

        log::info!("Produced {total} fragment(s)");
        Ok(())
    }
}

fn split_file(fragmenter: &Fragmenter, path: &Path) -> Result<SplitFile> {
    let text = FileReader::read_text(path)?;
    let fragments = fragmenter
        .split(&text)
        .with_context(|| format!("Failed to split {}", path.display()))?;

    log::debug!("{}: {} fragment(s)", path.display(), fragments.len());
    Ok(SplitFile {
        path: path.to_path_buf(),
        text,
        fragments,
    })
}
