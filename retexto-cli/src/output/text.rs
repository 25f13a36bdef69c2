//! Plain text output formatter

use super::{OutputFormatter, Segment};
use anyhow::Result;
use std::io::{self, Write};

/// Plain text formatter - outputs one segment per line.
///
/// Fragments spanning several lines keep their inner line breaks; a blank
/// line separates consecutive multi-line segments.
pub struct TextFormatter<W: Write> {
    writer: W,
    last_source: Option<String>,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_source: None,
        }
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> OutputFormatter for TextFormatter<W> {
    fn format_segment(&mut self, segment: &Segment<'_>) -> Result<()> {
        if let Some(source) = segment.source {
            if self.last_source.as_deref() != Some(source) {
                writeln!(self.writer, "==> {source} <==")?;
                self.last_source = Some(source.to_string());
            }
        }

        let text = segment.text.trim();
        writeln!(self.writer, "{text}")?;
        if text.contains('\n') {
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
