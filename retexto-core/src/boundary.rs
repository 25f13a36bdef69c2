//! Sentence-boundary search for fragment cuts

use crate::{
    error::{CoreError, Result},
    fragment::CutKind,
};

/// Default sentence terminators
pub const DEFAULT_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Closing marks that stay attached to the sentence they end
pub(crate) const CLOSERS: [char; 8] = ['"', '\'', '”', '’', '»', ')', ']', '}'];

/// Finds the sentence end nearest to, and not after, a candidate cut.
#[derive(Debug, Clone)]
pub struct BoundaryFinder {
    terminators: Vec<char>,
}

impl Default for BoundaryFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundaryFinder {
    /// Finder recognising `.`, `!` and `?`
    pub fn new() -> Self {
        Self {
            terminators: DEFAULT_TERMINATORS.to_vec(),
        }
    }

    /// Finder recognising a custom terminator set
    pub fn with_terminators<I: IntoIterator<Item = char>>(terminators: I) -> Self {
        Self {
            terminators: terminators.into_iter().collect(),
        }
    }

    /// Whether `ch` ends a sentence
    #[inline]
    pub fn is_terminator(&self, ch: char) -> bool {
        self.terminators.contains(&ch)
    }

    /// Offset at which to cut `text`, preferring the end of a sentence.
    ///
    /// Scans backward from `ideal_offset` down to `window_start` and returns
    /// the offset just after the first terminator found. Without one,
    /// `ideal_offset` is returned unchanged. When `ideal_offset <=
    /// window_start` the remainder of the text is consumed and `text.len()`
    /// is returned.
    pub fn find_cut(&self, text: &str, ideal_offset: usize, window_start: usize) -> Result<usize> {
        self.locate_cut(text, ideal_offset, window_start)
            .map(|(offset, _)| offset)
    }

    /// Like [`find_cut`](Self::find_cut), also reporting how the cut was chosen
    pub fn locate_cut(
        &self,
        text: &str,
        ideal_offset: usize,
        window_start: usize,
    ) -> Result<(usize, CutKind)> {
        check_offset(text, ideal_offset)?;
        check_offset(text, window_start)?;

        if ideal_offset <= window_start {
            return Ok((text.len(), CutKind::EndOfText));
        }

        // Include the character starting at `ideal_offset` in the scan
        let upper = text[ideal_offset..]
            .chars()
            .next()
            .map_or(text.len(), |ch| ideal_offset + ch.len_utf8());
        let window = &text[window_start..upper];

        let found = window
            .char_indices()
            .rev()
            .find(|&(pos, ch)| {
                self.is_terminator(ch) && self.ends_sentence(text, window_start + pos, ch)
            });

        match found {
            Some((pos, ch)) => {
                let after = window_start + pos + ch.len_utf8();
                Ok((skip_closers(text, after), CutKind::Sentence))
            }
            None => {
                tracing::warn!(
                    ideal_offset,
                    window_start,
                    "no sentence boundary in window, cutting mid-sentence"
                );
                Ok((ideal_offset, CutKind::MidSentence))
            }
        }
    }

    /// A terminator glued to a following letter or digit ("3.5", "www.x")
    /// does not end a sentence.
    fn ends_sentence(&self, text: &str, pos: usize, ch: char) -> bool {
        match text[pos + ch.len_utf8()..].chars().next() {
            Some(next) => !next.is_alphanumeric() || self.is_terminator(next),
            None => true,
        }
    }
}

fn skip_closers(text: &str, offset: usize) -> usize {
    let trailing: usize = text[offset..]
        .chars()
        .take_while(|ch| CLOSERS.contains(ch))
        .map(char::len_utf8)
        .sum();
    offset + trailing
}

fn check_offset(text: &str, offset: usize) -> Result<()> {
    if offset > text.len() || !text.is_char_boundary(offset) {
        return Err(CoreError::InvalidOffset {
            offset,
            len: text.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_preceding_sentence_end() {
        let text = "Hola mundo. Adiós amigo.";
        let finder = BoundaryFinder::new();
        let inside_adios = text.find("Adiós").unwrap() + 2;

        let cut = finder.find_cut(text, inside_adios, 0).unwrap();
        assert_eq!(&text[..cut], "Hola mundo.");
    }

    #[test]
    fn test_falls_back_to_ideal_offset() {
        let text = "hola mundo adiós amigo";
        let finder = BoundaryFinder::new();

        let (cut, kind) = finder.locate_cut(text, 11, 0).unwrap();
        assert_eq!(cut, 11);
        assert_eq!(kind, CutKind::MidSentence);
    }

    #[test]
    fn test_ideal_before_window_consumes_remainder() {
        let text = "Uno. Dos. Tres.";
        let finder = BoundaryFinder::new();

        assert_eq!(finder.find_cut(text, 4, 4).unwrap(), text.len());
        assert_eq!(finder.find_cut(text, 2, 5).unwrap(), text.len());
    }

    #[test]
    fn test_terminator_before_window_is_ignored() {
        let text = "Uno. dos tres cuatro";
        let finder = BoundaryFinder::new();

        let (cut, kind) = finder.locate_cut(text, 13, 5).unwrap();
        assert_eq!(cut, 13);
        assert_eq!(kind, CutKind::MidSentence);
    }

    #[test]
    fn test_terminator_at_ideal_offset_counts() {
        let text = "¿Qué? Nada";
        let finder = BoundaryFinder::new();
        let question = text.find('?').unwrap();

        assert_eq!(finder.find_cut(text, question, 0).unwrap(), question + 1);
    }

    #[test]
    fn test_decimal_point_is_not_a_boundary() {
        let text = "Mide 3.5 metros de alto";
        let finder = BoundaryFinder::new();

        let (_, kind) = finder.locate_cut(text, 15, 0).unwrap();
        assert_eq!(kind, CutKind::MidSentence);
    }

    #[test]
    fn test_terminator_glued_to_a_word_is_not_a_boundary() {
        let text = "Hola.Adiós amigo";
        let finder = BoundaryFinder::new();

        let (cut, kind) = finder.locate_cut(text, text.find("amigo").unwrap(), 0).unwrap();
        assert_eq!(kind, CutKind::MidSentence);
        assert_eq!(&text[..cut], "Hola.Adiós ");
    }

    #[test]
    fn test_closing_quote_stays_with_sentence() {
        let text = "Dijo «basta.» Luego calló.";
        let finder = BoundaryFinder::new();
        let luego = text.find("Luego").unwrap();

        let cut = finder.find_cut(text, luego + 2, 0).unwrap();
        assert_eq!(&text[..cut], "Dijo «basta.»");
    }

    #[test]
    fn test_rejects_offsets_inside_a_character() {
        let text = "adiós";
        let finder = BoundaryFinder::new();
        let inside_o = text.find('ó').unwrap() + 1;

        assert!(matches!(
            finder.find_cut(text, inside_o, 0),
            Err(CoreError::InvalidOffset { .. })
        ));
        assert!(finder.find_cut(text, 99, 0).is_err());
    }

    #[test]
    fn test_custom_terminators() {
        let text = "Primero… después";
        let finder = BoundaryFinder::with_terminators(['…']);
        let cut = finder.find_cut(text, text.len(), 0).unwrap();
        assert_eq!(&text[..cut], "Primero…");
    }
}
