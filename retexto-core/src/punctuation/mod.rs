//! Punctuation reconstruction for unpunctuated transcripts
//!
//! A [`RulePipeline`] of regex rewrites inserts commas before discourse and
//! relative-clause markers; sentences are then tokenized, terminated and
//! capitalized by [`PunctuationReconstructor`].

mod reconstructor;
mod rule;

pub use reconstructor::PunctuationReconstructor;
pub use rule::{Rule, RulePipeline};
