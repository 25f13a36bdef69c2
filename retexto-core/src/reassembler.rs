//! Reassembly of processed fragments into one text
//!
//! Processed fragments are joined in sequence order with a single space.
//! Before joining, the text each fragment shares with its predecessor is
//! removed. When the processed fragment still begins with the shared source
//! text the removal is exact; otherwise leading words are dropped until
//! their measured size reaches the overlap, which is only approximate since
//! a rewrite may change the words it was given.

use crate::error::{CoreError, Result};
use crate::estimator::{measure_words, LengthEstimator, WordCountEstimator};
use crate::fragment::Fragment;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How shared text between neighbouring fragments is treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Remove the overlap from every fragment after the first
    #[default]
    Trim,
    /// Join fragments as they are
    Keep,
    /// Remove the overlap only from fragments that fell back to their
    /// original text, where it is known to be exact
    TrimFallback,
}

/// Whether a fragment was processed or replaced by its original text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Processed,
    Fallback { reason: String },
}

/// The result for a single fragment of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentOutcome {
    pub sequence_index: usize,
    pub text: String,
    /// Source text shared with the previous fragment
    pub overlap_text: String,
    /// Measured size of `overlap_text`
    pub overlap_size: usize,
    pub status: OutcomeStatus,
}

impl FragmentOutcome {
    /// A successfully processed fragment of `source`
    pub fn processed(fragment: &Fragment, source: &str, text: String) -> Self {
        Self::with_status(fragment, source, text, OutcomeStatus::Processed)
    }

    /// A fragment whose processing failed; carries the original text
    pub fn fallback(fragment: &Fragment, source: &str, reason: impl Into<String>) -> Self {
        let status = OutcomeStatus::Fallback {
            reason: reason.into(),
        };
        Self::with_status(fragment, source, fragment.text(source).to_string(), status)
    }

    fn with_status(fragment: &Fragment, source: &str, text: String, status: OutcomeStatus) -> Self {
        let start = fragment.start();
        Self {
            sequence_index: fragment.sequence_index,
            text,
            overlap_text: source[start..start + fragment.overlap_bytes].to_string(),
            overlap_size: fragment.overlap_with_previous,
            status,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.status, OutcomeStatus::Fallback { .. })
    }
}

/// Final text of a possibly partial run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Merged {
    pub text: String,
    /// Sequence indices that fell back to unprocessed text
    pub fallbacks: Vec<usize>,
}

impl Merged {
    pub fn is_complete(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// Joins fragment outputs in sequence order
#[derive(Clone)]
pub struct Reassembler {
    policy: OverlapPolicy,
    estimator: Arc<dyn LengthEstimator>,
}

impl std::fmt::Debug for Reassembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reassembler")
            .field("policy", &self.policy)
            .field("estimator", &self.estimator.name())
            .finish()
    }
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new(OverlapPolicy::default())
    }
}

impl Reassembler {
    /// Reassembler measuring overlaps in words
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            policy,
            estimator: Arc::new(WordCountEstimator),
        }
    }

    /// Measure overlaps with the estimator that sized the fragments
    pub fn with_estimator(mut self, estimator: Arc<dyn LengthEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Join processed fragments; `overlaps` must have one entry per fragment.
    ///
    /// Only the measured overlap is known here, so under
    /// [`OverlapPolicy::Trim`] removal is always approximate.
    pub fn merge<S: AsRef<str>>(&self, processed: &[S], overlaps: &[usize]) -> Result<String> {
        if processed.len() != overlaps.len() {
            return Err(CoreError::LengthMismatch {
                expected: processed.len(),
                actual: overlaps.len(),
            });
        }

        let trim = self.policy == OverlapPolicy::Trim;
        let pieces = processed
            .iter()
            .zip(overlaps)
            .enumerate()
            .map(|(index, (text, &overlap))| {
                let text = text.as_ref();
                if trim && index > 0 && overlap > 0 {
                    self.drop_measured(text, overlap)
                } else {
                    text
                }
            });

        Ok(join(pieces))
    }

    /// Join per-fragment outcomes, whatever order they arrive in
    pub fn assemble(&self, mut outcomes: Vec<FragmentOutcome>) -> Merged {
        outcomes.sort_by_key(|outcome| outcome.sequence_index);

        let fallbacks: Vec<usize> = outcomes
            .iter()
            .filter(|outcome| outcome.is_fallback())
            .map(|outcome| outcome.sequence_index)
            .collect();

        let text = join(outcomes.iter().map(|outcome| self.piece(outcome)));

        if !fallbacks.is_empty() {
            tracing::warn!(
                fallbacks = fallbacks.len(),
                total = outcomes.len(),
                "assembled text contains unprocessed fragments"
            );
        }

        Merged { text, fallbacks }
    }

    fn piece<'a>(&self, outcome: &'a FragmentOutcome) -> &'a str {
        let trim = match self.policy {
            OverlapPolicy::Trim => true,
            OverlapPolicy::Keep => false,
            OverlapPolicy::TrimFallback => outcome.is_fallback(),
        };
        if !trim || outcome.overlap_text.is_empty() {
            return &outcome.text;
        }

        match strip_shared(&outcome.text, &outcome.overlap_text) {
            Some(rest) => rest,
            None => {
                tracing::debug!(
                    index = outcome.sequence_index,
                    overlap = outcome.overlap_size,
                    "processed fragment no longer starts with its overlap, trimming by size"
                );
                self.drop_measured(&outcome.text, outcome.overlap_size)
            }
        }
    }

    /// Drop leading words until their measured size reaches `overlap`
    fn drop_measured<'a>(&self, text: &'a str, overlap: usize) -> &'a str {
        let mut dropped = 0usize;
        for word in measure_words(text, self.estimator.as_ref()) {
            if dropped >= overlap {
                return &text[word.range.start..];
            }
            dropped = dropped.saturating_add(word.size);
        }
        ""
    }
}

/// `text` without its leading `shared` words, if it still starts with them
fn strip_shared<'a>(text: &'a str, shared: &str) -> Option<&'a str> {
    let shared = shared.trim();
    let rest = text.trim_start().strip_prefix(shared)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(ch) if ch.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

/// Join processed fragments with the default policy
pub fn merge<S: AsRef<str>>(processed: &[S], overlaps: &[usize]) -> Result<String> {
    Reassembler::default().merge(processed, overlaps)
}

fn join<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    let mut result = String::new();
    for piece in pieces.map(str::trim).filter(|piece| !piece.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(piece);
    }
    result
}
