use crate::error::Result;
use crate::language::{self, LanguageConfig};
use crate::punctuation::rule::RulePipeline;
use crate::sentence::{capitalize_first, closing_terminator, SentenceSplitter};

/// Restores commas, sentence ends and capitalization in unpunctuated text.
///
/// The same input always produces the same output.
#[derive(Debug, Clone)]
pub struct PunctuationReconstructor {
    language: String,
    pipeline: RulePipeline,
    splitter: SentenceSplitter,
}

impl PunctuationReconstructor {
    /// Reconstructor for an embedded language ("es", "en", or their names)
    pub fn for_language(code: &str) -> Result<Self> {
        let config = language::get_config(code)?;
        Self::from_config(&config)
    }

    /// Reconstructor from any language configuration
    pub fn from_config(config: &LanguageConfig) -> Result<Self> {
        let pipeline = RulePipeline::from_config(&config.punctuation)?;
        let splitter = SentenceSplitter::new(
            config.terminators.chars.iter().copied(),
            config.abbreviations.all(),
        );

        Ok(Self {
            language: config.metadata.code.clone(),
            pipeline,
            splitter,
        })
    }

    /// Reconstructor with a custom pipeline
    pub fn with_pipeline(mut self, pipeline: RulePipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn pipeline(&self) -> &RulePipeline {
        &self.pipeline
    }

    /// Reconstructed text: sentences joined by single spaces
    pub fn reconstruct(&self, text: &str) -> String {
        self.sentences(text).join(" ")
    }

    /// Reconstructed sentences, each terminated and capitalized
    pub fn sentences(&self, text: &str) -> Vec<String> {
        let rewritten = self.pipeline.apply(text);

        self.splitter
            .split(&rewritten)
            .iter()
            .map(|sentence| {
                let mut body = capitalize_first(sentence.text(&rewritten));
                if !sentence.terminated {
                    body.push(closing_terminator(&body));
                }
                body
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spanish() -> PunctuationReconstructor {
        PunctuationReconstructor::for_language("es").unwrap()
    }

    #[test]
    fn test_plain_transcript() {
        let result = spanish().reconstruct("hola como estas yo bien y tu");
        assert_eq!(result, "Hola como estas yo bien y tu.");
    }

    #[test]
    fn test_deterministic() {
        let reconstructor = spanish();
        let text = "bueno pero no se donde esta el libro sin embargo lo busco";
        assert_eq!(reconstructor.reconstruct(text), reconstructor.reconstruct(text));
    }

    #[test]
    fn test_discourse_markers() {
        assert_eq!(
            spanish().reconstruct("hola pero no quiero sin embargo iré"),
            "Hola, pero no quiero, sin embargo iré."
        );
    }

    #[test]
    fn test_relative_marker() {
        assert_eq!(
            spanish().reconstruct("la casa donde vivo es grande"),
            "La casa, donde vivo es grande."
        );
    }

    #[test]
    fn test_list_head() {
        assert_eq!(
            spanish().reconstruct("paso 1 luego mezclar"),
            "Paso 1, luego mezclar."
        );
    }

    #[test]
    fn test_existing_sentences_are_capitalized() {
        assert_eq!(
            spanish().sentences("ya llegué. ¿qué hora es"),
            vec!["Ya llegué.", "¿Qué hora es?"]
        );
    }

    #[test]
    fn test_abbreviation_keeps_sentence() {
        assert_eq!(
            spanish().sentences("vino el sr. garcía ayer"),
            vec!["Vino el sr. garcía ayer."]
        );
    }

    #[test]
    fn test_inverted_exclamation() {
        assert_eq!(spanish().reconstruct("¡qué bien"), "¡Qué bien!");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(spanish().reconstruct(""), "");
        assert_eq!(spanish().reconstruct("   "), "");
    }

    #[test]
    fn test_english() {
        let reconstructor = PunctuationReconstructor::for_language("english").unwrap();
        assert_eq!(reconstructor.language(), "en");
        assert_eq!(
            reconstructor.reconstruct("it was late but we stayed"),
            "It was late, but we stayed."
        );
    }

    #[test]
    fn test_unknown_language() {
        assert!(PunctuationReconstructor::for_language("xx").is_err());
    }
}
