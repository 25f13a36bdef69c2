//! Fragment records produced by the fragmenter

use serde::Serialize;
use std::ops::Range;

/// How the end of a fragment was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CutKind {
    /// Just after a sentence terminator
    Sentence,
    /// No terminator in the search window; cut at the size limit
    MidSentence,
    /// The remainder of the text was consumed
    EndOfText,
    /// Input below the lowest tier; the whole text is one fragment
    Whole,
}

impl CutKind {
    /// Serialized name
    pub fn as_str(self) -> &'static str {
        match self {
            CutKind::Sentence => "sentence",
            CutKind::MidSentence => "mid_sentence",
            CutKind::EndOfText => "end_of_text",
            CutKind::Whole => "whole",
        }
    }
}

/// One bounded slice of the source text.
///
/// Offsets are byte offsets into the source and always fall on UTF-8
/// character boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    /// Position of this fragment in the run, starting at 0
    pub sequence_index: usize,
    /// Byte range `[start, end)` in the source text
    pub range: Range<usize>,
    /// Measured size of the leading text shared with the previous fragment
    pub overlap_with_previous: usize,
    /// Byte length of that shared leading text
    pub overlap_bytes: usize,
    /// Measured size of the whole fragment
    pub size: usize,
    /// How the end offset was chosen
    pub cut: CutKind,
}

impl Fragment {
    /// Start offset (inclusive)
    pub fn start(&self) -> usize {
        self.range.start
    }

    /// End offset (exclusive)
    pub fn end(&self) -> usize {
        self.range.end
    }

    /// Byte length
    pub fn len(&self) -> usize {
        self.range.end - self.range.start
    }

    /// Always false for fragments produced by the fragmenter
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// The fragment's slice of `source`
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.clone()]
    }

    /// The part of the fragment that does not repeat the previous one
    pub fn fresh_text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.start + self.overlap_bytes..self.range.end]
    }
}
