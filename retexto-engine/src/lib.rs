//! Async orchestration for fragment-by-fragment text rewriting
//!
//! This crate drives a [`FragmentProcessor`] (usually a remote rewriting
//! service) over the fragments produced by `retexto-core`, applying a
//! [`ProcessingPolicy`] for retries, timeouts, pacing, concurrency and
//! failure handling, then reassembles the results in sequence order.
//!
//! # Example
//!
//! ```rust
//! use retexto_engine::{IdentityProcessor, RewritePipeline};
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let pipeline = RewritePipeline::new(IdentityProcessor).unwrap();
//! let output = runtime.block_on(pipeline.run_text("Hola mundo.")).unwrap();
//! assert_eq!(output.text, "Hola mundo.");
//! ```

#![warn(missing_docs)]

pub mod artifact;
pub mod config;
pub mod error;
pub mod executor;
pub mod input;
pub mod pipeline;
pub mod processor;

// Re-export key types
pub use artifact::{Artifact, ARTIFACT_FILE_NAME, ARTIFACT_MEDIA_TYPE};
pub use config::{FailurePolicy, ProcessingPolicy};
pub use error::{EngineError, ProcessingError, Result};
pub use executor::{ExecutionMode, Executor};
pub use input::Input;
pub use pipeline::{RewritePipeline, RewritePipelineBuilder, RunMetadata, RunOutput};
pub use processor::{FnProcessor, FragmentProcessor, IdentityProcessor, PunctuationProcessor};

// Re-export from core for convenience
pub use retexto_core::{
    CutKind, EstimatorKind, Fragment, FragmentOutcome, FragmenterConfig, OutcomeStatus,
    OverlapPolicy, SizeTier,
};
