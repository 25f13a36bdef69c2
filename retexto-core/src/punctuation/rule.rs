//! Rewrite rules and the ordered pipeline that applies them

use crate::error::{CoreError, Result};
use crate::language::Punctuation;
use regex::Regex;

/// Characters after which a comma is never inserted
const NO_COMMA_AFTER: &str = r"\s,;:.!?¿¡…";

/// A single pure rewrite step
#[derive(Debug, Clone)]
pub enum Rule {
    /// Collapse whitespace runs to one space and trim both ends
    NormalizeWhitespace,
    /// Insert ", " before a marker word or phrase
    CommaBefore { name: String, regex: Regex },
    /// Insert ", " between a number and a list-head word
    CommaAfterListHead { regex: Regex },
    /// Arbitrary regex replacement
    Substitute {
        name: String,
        regex: Regex,
        replacement: String,
    },
}

impl Rule {
    /// Comma rule for one marker; inner spaces of a phrase match any whitespace
    pub fn comma_before(marker: &str) -> Result<Self> {
        let name = format!("comma-before:{}", marker.trim());
        let phrase = marker
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        if phrase.is_empty() {
            return Err(CoreError::InvalidRule {
                name,
                reason: "empty marker".to_string(),
            });
        }

        let pattern = format!(r"(?i)([^{NO_COMMA_AFTER}])\s+({phrase})\b");
        let regex = compile(&name, &pattern)?;
        Ok(Self::CommaBefore { name, regex })
    }

    /// Comma rule for "<digit> <word>" where word is one of `words`
    ///
    /// Returns `None` when `words` is empty.
    pub fn comma_after_list_head<S: AsRef<str>>(words: &[S]) -> Result<Option<Self>> {
        if words.is_empty() {
            return Ok(None);
        }

        let alternatives = words
            .iter()
            .map(|w| regex::escape(w.as_ref().trim()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"(?i)(\d)\s+({alternatives})\b");
        let regex = compile("comma-after-list-head", &pattern)?;
        Ok(Some(Self::CommaAfterListHead { regex }))
    }

    /// Named substitution from a user-supplied pattern
    pub fn substitute(name: &str, pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self::Substitute {
            name: name.to_string(),
            regex: compile(name, pattern)?,
            replacement: replacement.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::NormalizeWhitespace => "normalize-whitespace",
            Self::CommaBefore { name, .. } => name,
            Self::CommaAfterListHead { .. } => "comma-after-list-head",
            Self::Substitute { name, .. } => name,
        }
    }

    /// Apply the rule, returning the rewritten text
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::NormalizeWhitespace => text.split_whitespace().collect::<Vec<_>>().join(" "),
            Self::CommaBefore { regex, .. } | Self::CommaAfterListHead { regex } => {
                regex.replace_all(text, "${1}, ${2}").into_owned()
            }
            Self::Substitute {
                regex, replacement, ..
            } => regex.replace_all(text, replacement.as_str()).into_owned(),
        }
    }
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| CoreError::InvalidRule {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// An ordered sequence of rules; each sees the previous one's output
#[derive(Debug, Clone, Default)]
pub struct RulePipeline {
    rules: Vec<Rule>,
}

impl RulePipeline {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Build the standard pipeline for a language:
    /// whitespace, discourse markers in order, relative markers,
    /// list heads, then extra substitutions.
    pub fn from_config(punctuation: &Punctuation) -> Result<Self> {
        let mut rules = vec![Rule::NormalizeWhitespace];

        for marker in punctuation
            .discourse_markers
            .iter()
            .chain(&punctuation.relative_markers)
        {
            rules.push(Rule::comma_before(marker)?);
        }

        if let Some(rule) = Rule::comma_after_list_head(&punctuation.list_head_words)? {
            rules.push(rule);
        }

        for sub in &punctuation.substitutions {
            rules.push(Rule::substitute(&sub.name, &sub.pattern, &sub.replacement)?);
        }

        tracing::debug!(rules = rules.len(), "built punctuation rule pipeline");
        Ok(Self { rules })
    }

    /// Append a rule at the end
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            Rule::NormalizeWhitespace.apply("  hola \t\n mundo  "),
            "hola mundo"
        );
    }

    #[test]
    fn test_comma_before_marker() {
        let rule = Rule::comma_before("pero").unwrap();
        assert_eq!(rule.apply("quiero ir pero no puedo"), "quiero ir, pero no puedo");
        assert_eq!(rule.name(), "comma-before:pero");
    }

    #[test]
    fn test_comma_before_does_not_double() {
        let rule = Rule::comma_before("pero").unwrap();
        assert_eq!(rule.apply("quiero ir, pero no"), "quiero ir, pero no");
        assert_eq!(rule.apply("no. pero sí"), "no. pero sí");
        assert_eq!(rule.apply("pero no"), "pero no");
    }

    #[test]
    fn test_comma_before_whole_words_only() {
        let rule = Rule::comma_before("pero").unwrap();
        assert_eq!(rule.apply("el perol hierve"), "el perol hierve");
        assert_eq!(rule.apply("un superhéroe pero"), "un superhéroe, pero");
    }

    #[test]
    fn test_comma_before_phrase_and_case() {
        let rule = Rule::comma_before("sin embargo").unwrap();
        assert_eq!(
            rule.apply("llovía Sin  embargo salimos"),
            "llovía, Sin  embargo salimos"
        );
    }

    #[test]
    fn test_comma_after_list_head() {
        let rule = Rule::comma_after_list_head(&["luego", "después"])
            .unwrap()
            .unwrap();
        assert_eq!(rule.apply("paso 1 luego mezclar"), "paso 1, luego mezclar");
        assert_eq!(rule.apply("paso uno luego"), "paso uno luego");
        assert!(Rule::comma_after_list_head::<&str>(&[]).unwrap().is_none());
    }

    #[test]
    fn test_invalid_substitution() {
        match Rule::substitute("broken", "(unclosed", "") {
            Err(CoreError::InvalidRule { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("expected InvalidRule, got {other:?}"),
        }
    }

    #[test]
    fn test_pipeline_order() {
        let mut pipeline = RulePipeline::new(vec![Rule::NormalizeWhitespace]);
        pipeline.push(Rule::substitute("ok", r"\bok\b", "vale").unwrap());
        pipeline.push(Rule::comma_before("vale").unwrap());

        assert_eq!(pipeline.len(), 3);
        assert_eq!(pipeline.apply("dijo   ok  y se fue"), "dijo, vale y se fue");
    }
}
