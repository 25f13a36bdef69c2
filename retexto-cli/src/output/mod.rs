//! Output formatting module
//!
//! Both `split` (fragments) and `punctuate` (sentences) write through the
//! same formatters; a [`Segment`] is whichever of the two is being printed.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// One printable unit of output
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    /// The segment text
    pub text: &'a str,
    /// Byte offset of the segment in its source
    pub offset: usize,
    /// Leading bytes shared with the previous segment
    pub overlap_bytes: usize,
    /// How the segment ended, when that is meaningful
    pub cut: Option<&'a str>,
    /// File the segment came from, when several files are printed together
    pub source: Option<&'a str>,
}

impl<'a> Segment<'a> {
    /// A segment with no overlap, cut or source annotations
    pub fn plain(text: &'a str, offset: usize) -> Self {
        Self {
            text,
            offset,
            overlap_bytes: 0,
            cut: None,
            source: None,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send {
    /// Format and output a single segment
    fn format_segment(&mut self, segment: &Segment<'_>) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one segment per line
    Text,
    /// JSON array of segments with offsets
    Json,
    /// Markdown numbered list
    Markdown,
}

impl OutputFormat {
    /// All formats, in display order
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Text, OutputFormat::Json, OutputFormat::Markdown];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            OutputFormat::Text => "Plain text, one fragment or sentence per line",
            OutputFormat::Json => "JSON array with offsets, overlaps and cut kinds",
            OutputFormat::Markdown => "Markdown numbered list with a total",
        }
    }

    /// Formatter writing this format to `writer`
    pub fn formatter<'w, W>(self, writer: W) -> Box<dyn OutputFormatter + 'w>
    where
        W: Write + Send + 'w,
    {
        match self {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown output format '{s}'"))
    }
}

/// Buffered writer for `path`, or stdout when no path is given
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::{JsonFormatter, SegmentData};
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;
