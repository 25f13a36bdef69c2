//! Text fragmentation and punctuation reconstruction
//!
//! This crate holds the synchronous, deterministic half of retexto:
//!
//! - **Fragmentation**: a [`Fragmenter`] measures a document with a
//!   [`LengthEstimator`], picks a fragment size from its [`SizeTier`]s and
//!   carves overlapping fragments that end on sentence boundaries when the
//!   [`BoundaryFinder`] can find one.
//! - **Punctuation**: a [`PunctuationReconstructor`] repairs unpunctuated
//!   transcripts with an ordered [`RulePipeline`] and sentence tokenization.
//! - **Reassembly**: a [`Reassembler`] joins processed fragments back into
//!   one text in sequence order.
//!
//! # Example
//!
//! ```rust
//! use retexto_core::{Fragmenter, FragmenterConfig, WordCountEstimator};
//!
//! let config = FragmenterConfig::uniform(5, 4, 0).unwrap();
//! let fragmenter = Fragmenter::new(WordCountEstimator, config).unwrap();
//!
//! let text = "Uno dos tres. Cuatro cinco. Seis siete ocho nueve.";
//! let fragments = fragmenter.split(text).unwrap();
//!
//! assert_eq!(fragments.len(), 3);
//! assert_eq!(fragments[0].text(text), "Uno dos tres.");
//! ```

pub mod boundary;
pub mod error;
pub mod estimator;
pub mod fragment;
pub mod fragmenter;
pub mod language;
pub mod punctuation;
pub mod reassembler;
pub mod sentence;
pub mod tier;

pub use boundary::{BoundaryFinder, DEFAULT_TERMINATORS};
pub use error::{CoreError, Result};
pub use estimator::{
    CharCountEstimator, EstimatorKind, FnEstimator, HeuristicTokenEstimator, LengthEstimator,
    WordCountEstimator,
};
pub use fragment::{CutKind, Fragment};
pub use fragmenter::{split, Fragmenter};
pub use language::LanguageConfig;
pub use punctuation::{PunctuationReconstructor, Rule, RulePipeline};
pub use reassembler::{
    merge, FragmentOutcome, Merged, OutcomeStatus, OverlapPolicy, Reassembler,
};
pub use sentence::{Sentence, SentenceSplitter};
pub use tier::{defaults, FragmenterConfig, SizeTier};
