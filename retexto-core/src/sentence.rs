//! Language-aware sentence tokenization

use crate::boundary::{CLOSERS, DEFAULT_TERMINATORS};
use std::collections::HashSet;
use std::ops::Range;

/// Marks that may open a sentence before its first letter
const OPENERS: [char; 7] = ['¿', '¡', '"', '“', '«', '(', '\''];

/// A sentence: a maximal span ending in a terminator, or the end of input.
///
/// The range never includes surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// Byte range in the tokenized text
    pub range: Range<usize>,
    /// Whether the sentence ends with a terminator
    pub terminated: bool,
}

impl Sentence {
    /// The sentence's slice of `source`
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.clone()]
    }
}

/// Splits text into sentences using a terminator set and an abbreviation
/// list. A period after a known abbreviation does not end a sentence.
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    terminators: Vec<char>,
    abbreviations: HashSet<String>,
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_TERMINATORS, std::iter::empty::<String>())
    }
}

impl SentenceSplitter {
    /// Create a splitter; abbreviations are matched case-insensitively and
    /// without their trailing period
    pub fn new<T, A, S>(terminators: T, abbreviations: A) -> Self
    where
        T: IntoIterator<Item = char>,
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            terminators: terminators.into_iter().collect(),
            abbreviations: abbreviations
                .into_iter()
                .map(|a| a.as_ref().trim_end_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// Whether `ch` ends a sentence
    pub fn is_terminator(&self, ch: char) -> bool {
        self.terminators.contains(&ch)
    }

    /// Sentences of `text`, in order
    pub fn split(&self, text: &str) -> Vec<Sentence> {
        let mut sentences = Vec::new();
        let mut start: Option<usize> = None;
        let mut chars = text.char_indices().peekable();

        while let Some((pos, ch)) = chars.next() {
            if start.is_none() {
                if ch.is_whitespace() {
                    continue;
                }
                start = Some(pos);
            }

            if !self.is_terminator(ch) {
                continue;
            }

            // Absorb runs like "?!" or "..." and trailing closers
            let mut end = pos + ch.len_utf8();
            while let Some(&(next_pos, next)) = chars.peek() {
                if self.is_terminator(next) || CLOSERS.contains(&next) {
                    end = next_pos + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }

            let followed_by_space = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
            if !followed_by_space || (ch == '.' && self.is_abbreviation(text, pos)) {
                continue;
            }

            if let Some(begin) = start.take() {
                sentences.push(Sentence {
                    range: begin..end,
                    terminated: true,
                });
            }
        }

        if let Some(begin) = start {
            let end = begin + text[begin..].trim_end().len();
            if end > begin {
                sentences.push(Sentence {
                    range: begin..end,
                    terminated: false,
                });
            }
        }

        sentences
    }

    /// Whether the word ending at the period at `dot` is a known abbreviation
    fn is_abbreviation(&self, text: &str, dot: usize) -> bool {
        if self.abbreviations.is_empty() {
            return false;
        }

        let before = &text[..dot];
        let word_start = before
            .char_indices()
            .rev()
            .find(|&(_, ch)| ch.is_whitespace())
            .map_or(0, |(pos, ch)| pos + ch.len_utf8());
        let word = before[word_start..].trim_start_matches(|ch| OPENERS.contains(&ch));

        !word.is_empty() && self.abbreviations.contains(&word.to_lowercase())
    }
}

/// Uppercase the first letter that follows any opening marks
pub(crate) fn capitalize_first(sentence: &str) -> String {
    let mut result = String::with_capacity(sentence.len());
    let mut done = false;

    for ch in sentence.chars() {
        if !done && ch.is_alphabetic() {
            result.extend(ch.to_uppercase());
            done = true;
        } else {
            if !done && !OPENERS.contains(&ch) && !ch.is_whitespace() {
                // Digits or symbols open the sentence; leave it alone
                done = true;
            }
            result.push(ch);
        }
    }

    result
}

/// Terminator to append to an unterminated sentence, mirroring an inverted
/// opening mark when present
pub(crate) fn closing_terminator(sentence: &str) -> char {
    match sentence.trim_start().chars().next() {
        Some('¿') => '?',
        Some('¡') => '!',
        _ => '.',
    }
}
