//! Markdown output formatter

use super::{OutputFormatter, Segment};
use anyhow::Result;
use std::io::Write;

/// Markdown formatter - outputs segments as a markdown list
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    segment_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            segment_count: 0,
        }
    }
}

impl<W: Write + Send> OutputFormatter for MarkdownFormatter<W> {
    fn format_segment(&mut self, segment: &Segment<'_>) -> Result<()> {
        self.segment_count += 1;
        let text = segment.text.split_whitespace().collect::<Vec<_>>().join(" ");
        writeln!(self.writer, "{}. {}", self.segment_count, text)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total segments: {}*", self.segment_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
