//! Length estimation
//!
//! A [`LengthEstimator`] converts a span of text into an abstract size,
//! usually a token count. Deployments swap the estimator to match the
//! tokenizer of whatever service receives the fragments; the fragmenter only
//! relies on the contract documented on the trait.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

/// Measures the size of a text span.
///
/// Implementations must be deterministic and monotonic:
/// `measure(a + b) >= measure(a)`. The fragmenter measures one word at a
/// time, so a single call should cost roughly linear time in its input.
pub trait LengthEstimator: Send + Sync {
    /// Size of `text` in estimator units
    fn measure(&self, text: &str) -> usize;

    /// Short identifier used in logs and reports
    fn name(&self) -> &str {
        "custom"
    }
}

impl<T: LengthEstimator + ?Sized> LengthEstimator for &T {
    fn measure(&self, text: &str) -> usize {
        (**self).measure(text)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: LengthEstimator + ?Sized> LengthEstimator for Arc<T> {
    fn measure(&self, text: &str) -> usize {
        (**self).measure(text)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: LengthEstimator + ?Sized> LengthEstimator for Box<T> {
    fn measure(&self, text: &str) -> usize {
        (**self).measure(text)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Counts whitespace-delimited words
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCountEstimator;

impl LengthEstimator for WordCountEstimator {
    fn measure(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn name(&self) -> &str {
        "words"
    }
}

/// Counts Unicode scalar values
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCountEstimator;

impl LengthEstimator for CharCountEstimator {
    fn measure(&self, text: &str) -> usize {
        text.chars().count()
    }

    fn name(&self) -> &str {
        "chars"
    }
}

/// Approximates subword tokenizers without loading a vocabulary.
///
/// Each word costs `ceil(chars / chars_per_token)` tokens, and never less
/// than one.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicTokenEstimator {
    chars_per_token: usize,
}

impl HeuristicTokenEstimator {
    /// Default ratio observed for Latin-script text on BPE tokenizers
    pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;

    /// Create an estimator with a custom characters-per-token ratio
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }

    /// Characters counted as one token
    pub fn chars_per_token(&self) -> usize {
        self.chars_per_token
    }
}

impl Default for HeuristicTokenEstimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CHARS_PER_TOKEN)
    }
}

impl LengthEstimator for HeuristicTokenEstimator {
    fn measure(&self, text: &str) -> usize {
        text.split_whitespace()
            .map(|word| word.chars().count().div_ceil(self.chars_per_token).max(1))
            .sum()
    }

    fn name(&self) -> &str {
        "tokens"
    }
}

/// Adapts a plain function or closure, e.g. a real tokenizer's encode call
pub struct FnEstimator<F> {
    name: String,
    measure: F,
}

impl<F> FnEstimator<F>
where
    F: Fn(&str) -> usize + Send + Sync,
{
    /// Wrap `measure` under the given name
    pub fn new(name: impl Into<String>, measure: F) -> Self {
        Self {
            name: name.into(),
            measure,
        }
    }
}

impl<F> std::fmt::Debug for FnEstimator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnEstimator").field("name", &self.name).finish()
    }
}

impl<F> LengthEstimator for FnEstimator<F>
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn measure(&self, text: &str) -> usize {
        (self.measure)(text)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Built-in estimators selectable from configuration files and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorKind {
    /// [`WordCountEstimator`]
    Words,
    /// [`CharCountEstimator`]
    Chars,
    /// [`HeuristicTokenEstimator`] with the default ratio
    #[default]
    Tokens,
}

impl EstimatorKind {
    /// All built-in kinds, in display order
    pub const ALL: [EstimatorKind; 3] = [
        EstimatorKind::Words,
        EstimatorKind::Chars,
        EstimatorKind::Tokens,
    ];

    /// Instantiate the estimator
    pub fn build(self) -> Arc<dyn LengthEstimator> {
        match self {
            EstimatorKind::Words => Arc::new(WordCountEstimator),
            EstimatorKind::Chars => Arc::new(CharCountEstimator),
            EstimatorKind::Tokens => Arc::new(HeuristicTokenEstimator::default()),
        }
    }

    /// Configuration name
    pub fn as_str(self) -> &'static str {
        match self {
            EstimatorKind::Words => "words",
            EstimatorKind::Chars => "chars",
            EstimatorKind::Tokens => "tokens",
        }
    }
}

/// A measured word: its byte range in the source and its size
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MeasuredWord {
    pub range: Range<usize>,
    pub size: usize,
}

/// Split `text` into whitespace-delimited words and measure each one once
pub(crate) fn measure_words<E>(text: &str, estimator: &E) -> Vec<MeasuredWord>
where
    E: LengthEstimator + ?Sized,
{
    let mut words = Vec::new();
    let mut word_start: Option<usize> = None;

    for (pos, ch) in text.char_indices() {
        match (ch.is_whitespace(), word_start) {
            (true, Some(start)) => {
                words.push(measured(text, start..pos, estimator));
                word_start = None;
            }
            (false, None) => word_start = Some(pos),
            _ => {}
        }
    }

    if let Some(start) = word_start {
        words.push(measured(text, start..text.len(), estimator));
    }

    words
}

fn measured<E>(text: &str, range: Range<usize>, estimator: &E) -> MeasuredWord
where
    E: LengthEstimator + ?Sized,
{
    let size = estimator.measure(&text[range.clone()]);
    MeasuredWord { range, size }
}
