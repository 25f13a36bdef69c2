//! Adaptive text fragmentation
//!
//! The fragmenter picks a fragment size from the tier matching the total
//! size of the document, then carves fragments that end on sentence
//! boundaries whenever one is available. Consecutive fragments share a
//! small overlap so that whoever processes fragment `i + 1` sees the tail of
//! fragment `i`.

use crate::{
    boundary::BoundaryFinder,
    error::{CoreError, Result},
    estimator::{measure_words, LengthEstimator, MeasuredWord},
    fragment::{CutKind, Fragment},
    tier::{FragmenterConfig, SizeTier},
};
use std::sync::Arc;

/// Splits text into bounded, overlapping fragments
#[derive(Clone)]
pub struct Fragmenter {
    estimator: Arc<dyn LengthEstimator>,
    finder: BoundaryFinder,
    config: FragmenterConfig,
}

impl std::fmt::Debug for Fragmenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fragmenter")
            .field("estimator", &self.estimator.name())
            .field("finder", &self.finder)
            .field("config", &self.config)
            .finish()
    }
}

impl Fragmenter {
    /// Create a fragmenter; the configuration is validated here
    pub fn new<E: LengthEstimator + 'static>(estimator: E, config: FragmenterConfig) -> Result<Self> {
        Self::from_shared(Arc::new(estimator), config)
    }

    /// Create a fragmenter around an estimator shared with other components
    pub fn from_shared(estimator: Arc<dyn LengthEstimator>, config: FragmenterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            estimator,
            finder: BoundaryFinder::new(),
            config,
        })
    }

    /// Replace the boundary finder, e.g. to recognise extra terminators
    pub fn with_boundary_finder(mut self, finder: BoundaryFinder) -> Self {
        self.finder = finder;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &FragmenterConfig {
        &self.config
    }

    /// The estimator used for sizing
    pub fn estimator(&self) -> &Arc<dyn LengthEstimator> {
        &self.estimator
    }

    /// Split `text` into fragments covering `[0, text.len())`
    pub fn split(&self, text: &str) -> Result<Vec<Fragment>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let total = self.estimator.measure(text);
        let Some(tier) = self.config.resolve(total) else {
            tracing::debug!(total, "input below the lowest tier, not splitting");
            return Ok(vec![whole(text, total)]);
        };

        let words = measure_words(text, self.estimator.as_ref());
        if words.is_empty() {
            return Ok(vec![whole(text, total)]);
        }

        tracing::debug!(
            total,
            fragment_size = tier.fragment_size,
            overlap = self.config.overlap,
            words = words.len(),
            "splitting text"
        );

        let fragments = Carver {
            text,
            words: &words,
            finder: &self.finder,
            budget: tier.fragment_size,
            overlap: self.config.overlap,
        }
        .carve()?;

        let mid_sentence = fragments
            .iter()
            .filter(|f| f.cut == CutKind::MidSentence)
            .count();
        tracing::info!(
            fragments = fragments.len(),
            mid_sentence,
            "text split into fragments"
        );

        Ok(fragments)
    }
}

/// Split `text` with explicit tiers and overlap.
///
/// Convenience wrapper over [`Fragmenter`] for one-off calls.
pub fn split<E: LengthEstimator + 'static>(
    text: &str,
    tiers: &[SizeTier],
    overlap: usize,
    estimator: E,
) -> Result<Vec<Fragment>> {
    let config = FragmenterConfig::new(tiers.to_vec(), overlap)?;
    Fragmenter::new(estimator, config)?.split(text)
}

fn whole(text: &str, size: usize) -> Fragment {
    Fragment {
        sequence_index: 0,
        range: 0..text.len(),
        overlap_with_previous: 0,
        overlap_bytes: 0,
        size,
        cut: CutKind::Whole,
    }
}

/// State for one split run
struct Carver<'a> {
    text: &'a str,
    words: &'a [MeasuredWord],
    finder: &'a BoundaryFinder,
    budget: usize,
    overlap: usize,
}

impl Carver<'_> {
    fn carve(&self) -> Result<Vec<Fragment>> {
        let len = self.text.len();
        let mut fragments = Vec::new();
        let mut start = 0;
        let mut previous_cut = 0;
        let mut overlap_size = 0;
        let mut overlap_bytes = 0;

        while start < len {
            let (cut, kind) = self.next_cut(start, previous_cut)?;
            if cut <= start {
                return Err(CoreError::Stalled { offset: start });
            }

            fragments.push(Fragment {
                sequence_index: fragments.len(),
                range: start..cut,
                overlap_with_previous: overlap_size,
                overlap_bytes,
                size: self.size_of(start, cut),
                cut: kind,
            });

            if cut >= len {
                break;
            }

            let (overlap_start, shared) = self.overlap_start(cut);
            if overlap_start > start && overlap_start < cut {
                overlap_size = shared;
                overlap_bytes = cut - overlap_start;
                start = overlap_start;
            } else {
                overlap_size = 0;
                overlap_bytes = 0;
                start = cut;
            }
            previous_cut = cut;
        }

        Ok(fragments)
    }

    /// End of the fragment starting at `start`
    fn next_cut(&self, start: usize, previous_cut: usize) -> Result<(usize, CutKind)> {
        let len = self.text.len();
        let first = self.words.partition_point(|w| w.range.start < start);

        let Some(ideal) = self.ideal_offset(first, previous_cut) else {
            // The rest fits in one fragment
            return Ok((len, CutKind::EndOfText));
        };

        let window_start = start.max(previous_cut);
        let (cut, kind) = self.finder.locate_cut(self.text, ideal, window_start)?;

        // Never leave a whitespace-only tail behind
        if self.text[cut..].trim().is_empty() {
            return Ok((len, CutKind::EndOfText));
        }

        Ok((cut, kind))
    }

    /// Offset where the cumulative size from word `first` first exceeds the
    /// budget, or `None` when the remaining words all fit.
    ///
    /// At least one word starting at or after `previous_cut` is always
    /// included so a fragment never consists solely of inherited overlap.
    fn ideal_offset(&self, first: usize, previous_cut: usize) -> Option<usize> {
        let mut accumulated = 0usize;
        let mut fresh_words = 0usize;

        for word in &self.words[first..] {
            let is_fresh = word.range.start >= previous_cut;
            if accumulated.saturating_add(word.size) > self.budget {
                if fresh_words == 0 && is_fresh {
                    return Some(word.range.end);
                }
                if fresh_words > 0 {
                    return Some(word.range.start);
                }
            }
            accumulated = accumulated.saturating_add(word.size);
            if is_fresh {
                fresh_words += 1;
            }
        }

        None
    }

    /// Back off from `cut` by whole words whose sizes sum to at most the
    /// overlap. Returns the new start and the measured size shared.
    fn overlap_start(&self, cut: usize) -> (usize, usize) {
        if self.overlap == 0 {
            return (cut, 0);
        }

        let end = self.words.partition_point(|w| w.range.end <= cut);
        let mut shared = 0usize;
        let mut overlap_start = cut;

        for word in self.words[..end].iter().rev() {
            if shared + word.size > self.overlap {
                break;
            }
            shared += word.size;
            overlap_start = word.range.start;
        }

        (overlap_start, shared)
    }

    fn size_of(&self, start: usize, end: usize) -> usize {
        let lo = self.words.partition_point(|w| w.range.start < start);
        let hi = self.words.partition_point(|w| w.range.end <= end);
        self.words
            .get(lo..hi.max(lo))
            .map_or(0, |words| words.iter().map(|w| w.size).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{CharCountEstimator, WordCountEstimator};

    fn uniform(fragment_size: usize, overlap: usize) -> FragmenterConfig {
        FragmenterConfig::uniform(0, fragment_size, overlap).unwrap()
    }

    fn texts<'a>(source: &'a str, fragments: &[Fragment]) -> Vec<&'a str> {
        fragments.iter().map(|f| f.text(source)).collect()
    }

    #[test]
    fn test_empty_text_has_no_fragments() {
        let fragmenter = Fragmenter::new(WordCountEstimator, uniform(3, 0)).unwrap();
        assert!(fragmenter.split("").unwrap().is_empty());
    }

    #[test]
    fn test_short_input_is_not_split() {
        let fragmenter = Fragmenter::new(WordCountEstimator, FragmenterConfig::default()).unwrap();
        let text = "Hola mundo. Adiós amigo.";

        let fragments = fragmenter.split(text).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text(text), text);
        assert_eq!(fragments[0].cut, CutKind::Whole);
    }

    #[test]
    fn test_splits_on_sentence_boundaries() {
        let fragmenter = Fragmenter::new(WordCountEstimator, uniform(4, 0)).unwrap();
        let text = "Uno dos tres. Cuatro cinco. Seis siete ocho nueve.";

        let fragments = fragmenter.split(text).unwrap();
        assert_eq!(
            texts(text, &fragments),
            vec!["Uno dos tres.", " Cuatro cinco.", " Seis siete ocho nueve."]
        );
        assert_eq!(fragments[0].cut, CutKind::Sentence);
        assert_eq!(fragments[2].cut, CutKind::EndOfText);
    }

    #[test]
    fn test_mid_sentence_fallback() {
        let fragmenter = Fragmenter::new(WordCountEstimator, uniform(3, 0)).unwrap();
        let text = "uno dos tres cuatro cinco seis siete";

        let fragments = fragmenter.split(text).unwrap();
        assert_eq!(
            texts(text, &fragments),
            vec!["uno dos tres ", "cuatro cinco seis ", "siete"]
        );
        assert_eq!(fragments[0].cut, CutKind::MidSentence);
    }

    #[test]
    fn test_overlap_is_carried_forward() {
        let fragmenter = Fragmenter::new(WordCountEstimator, uniform(4, 1)).unwrap();
        let text = "uno dos tres cuatro cinco seis siete";

        let fragments = fragmenter.split(text).unwrap();
        assert_eq!(
            texts(text, &fragments),
            vec!["uno dos tres cuatro ", "cuatro cinco seis siete"]
        );
        assert_eq!(fragments[1].overlap_with_previous, 1);
        assert_eq!(fragments[1].overlap_bytes, "cuatro ".len());
        assert_eq!(fragments[1].fresh_text(text), "cinco seis siete");
    }

    #[test]
    fn test_fragment_never_ends_inside_inherited_overlap() {
        let fragmenter = Fragmenter::new(WordCountEstimator, uniform(3, 2)).unwrap();
        let text = "Uno dos tres. cuatro cinco seis siete ocho";

        let fragments = fragmenter.split(text).unwrap();
        for pair in fragments.windows(2) {
            assert!(pair[1].end() > pair[0].end(), "{fragments:?}");
        }
        assert_eq!(fragments.last().unwrap().end(), text.len());
    }

    #[test]
    fn test_oversized_single_word_still_advances() {
        let fragmenter = Fragmenter::new(CharCountEstimator, uniform(3, 1)).unwrap();
        let text = "electroencefalograma corto";

        let fragments = fragmenter.split(text).unwrap();
        assert_eq!(fragments.first().unwrap().start(), 0);
        assert_eq!(fragments.last().unwrap().end(), text.len());
        assert!(fragments.len() >= 2);
    }

    #[test]
    fn test_multibyte_text_is_cut_on_char_boundaries() {
        let fragmenter = Fragmenter::new(WordCountEstimator, uniform(2, 1)).unwrap();
        let text = "canción añejo pingüino ñandú óleo árbol";

        for fragment in fragmenter.split(text).unwrap() {
            assert!(text.is_char_boundary(fragment.start()));
            assert!(text.is_char_boundary(fragment.end()));
        }
    }

    #[test]
    fn test_whitespace_tail_folds_into_last_fragment() {
        let fragmenter = Fragmenter::new(WordCountEstimator, uniform(2, 0)).unwrap();
        let text = "Uno dos.   \n";

        let fragments = fragmenter.split(text).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].end(), text.len());
    }

    #[test]
    fn test_cut_reaching_the_end_is_end_of_text() {
        let fragmenter = Fragmenter::new(CharCountEstimator, uniform(3, 0)).unwrap();

        let text = "corto electroencefalograma";
        let fragments = fragmenter.split(text).unwrap();
        assert_eq!(fragments.last().unwrap().end(), text.len());
        assert_eq!(fragments.last().unwrap().cut, CutKind::EndOfText);

        let text = "electroencefalograma   ";
        let fragments = fragmenter.split(text).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].end(), text.len());
        assert_eq!(fragments[0].cut, CutKind::EndOfText);
    }

    #[test]
    fn test_split_free_function_validates() {
        let result = split("uno dos", &[SizeTier::unbounded(0, 2)], 2, WordCountEstimator);
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }
}
