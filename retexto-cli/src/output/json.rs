//! JSON output formatter

use super::{OutputFormatter, Segment};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON formatter - outputs segments as a JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    segments: Vec<SegmentData>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentData {
    /// Position of the segment in its source, from 0
    pub index: usize,
    /// The segment text
    pub text: String,
    /// Starting byte offset in the source text
    pub offset: usize,
    /// Byte length of the segment
    pub length: usize,
    /// Leading bytes shared with the previous segment
    #[serde(default, skip_serializing_if = "is_zero")]
    pub overlap_bytes: usize,
    /// How the segment ended
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cut: Option<String>,
    /// Source file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            segments: Vec::new(),
        }
    }
}

impl<W: Write + Send> OutputFormatter for JsonFormatter<W> {
    fn format_segment(&mut self, segment: &Segment<'_>) -> Result<()> {
        let index = match segment.source {
            Some(source) => self
                .segments
                .iter()
                .filter(|s| s.source.as_deref() == Some(source))
                .count(),
            None => self.segments.len(),
        };

        self.segments.push(SegmentData {
            index,
            text: segment.text.to_string(),
            offset: segment.offset,
            length: segment.text.len(),
            overlap_bytes: segment.overlap_bytes,
            cut: segment.cut.map(str::to_string),
            source: segment.source.map(str::to_string),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.segments)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
