//! End-to-end rewriting pipeline and builder
//!
//! Fragment the input, run every fragment through the processor, reassemble.

use crate::{
    artifact::Artifact,
    config::ProcessingPolicy,
    error::Result,
    executor::{auto_select, executor_for, Batch, ExecutionMetrics, ExecutionMode},
    input::Input,
    processor::FragmentProcessor,
};
use retexto_core::{
    CutKind, EstimatorKind, Fragment, FragmentOutcome, Fragmenter, FragmenterConfig,
    LengthEstimator, OverlapPolicy, Reassembler,
};
use std::sync::Arc;
use tokio::time::Instant;

/// Splits, processes and reassembles text
pub struct RewritePipeline {
    fragmenter: Fragmenter,
    processor: Arc<dyn FragmentProcessor>,
    policy: ProcessingPolicy,
    mode: Option<ExecutionMode>,
    reassembler: Reassembler,
}

impl std::fmt::Debug for RewritePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewritePipeline")
            .field("fragmenter", &self.fragmenter)
            .field("processor", &self.processor.name())
            .field("policy", &self.policy)
            .field("mode", &self.mode)
            .field("reassembler", &self.reassembler)
            .finish()
    }
}

/// Final text plus everything needed to audit the run
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Reassembled text
    pub text: String,
    /// Fragments the input was split into
    pub fragments: Vec<Fragment>,
    /// Per-fragment outcomes in sequence order
    pub outcomes: Vec<FragmentOutcome>,
    /// Sequence indices that kept their original text
    pub fallbacks: Vec<usize>,
    /// Run metadata and metrics
    pub metadata: RunMetadata,
}

impl RunOutput {
    /// Whether every fragment was processed
    pub fn is_complete(&self) -> bool {
        self.fallbacks.is_empty()
    }

    /// Package the final text for download
    pub fn artifact(&self) -> Artifact {
        Artifact::new(self.text.clone())
    }
}

/// Run metadata
#[derive(Debug, Clone)]
pub struct RunMetadata {
    /// Execution mode that was actually used
    pub execution_mode: ExecutionMode,
    /// Estimator used for sizing
    pub estimator: String,
    /// Processor used
    pub processor: String,
    /// Total bytes of input
    pub bytes_processed: usize,
    /// Number of fragments
    pub fragment_count: usize,
    /// Fragments cut without a sentence boundary
    pub mid_sentence_cuts: usize,
    /// Processor calls, retries included
    pub attempts: usize,
    /// Processing time in milliseconds, fragmentation and reassembly included
    pub processing_time_ms: f64,
}

impl RunMetadata {
    fn new(
        metrics: &ExecutionMetrics,
        fragments: &[Fragment],
        pipeline: &RewritePipeline,
        bytes_processed: usize,
        started: Instant,
    ) -> Self {
        Self {
            execution_mode: metrics.mode_used,
            estimator: pipeline.fragmenter.estimator().name().to_string(),
            processor: pipeline.processor.name().to_string(),
            bytes_processed,
            fragment_count: fragments.len(),
            mid_sentence_cuts: fragments
                .iter()
                .filter(|f| f.cut == CutKind::MidSentence)
                .count(),
            attempts: metrics.attempts,
            processing_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

impl RewritePipeline {
    /// Pipeline with default tiers, token estimator and policy
    pub fn new<P: FragmentProcessor + 'static>(processor: P) -> Result<Self> {
        RewritePipelineBuilder::new(processor).build()
    }

    /// Start configuring a pipeline
    pub fn builder<P: FragmentProcessor + 'static>(processor: P) -> RewritePipelineBuilder {
        RewritePipelineBuilder::new(processor)
    }

    /// The fragmenter in use
    pub fn fragmenter(&self) -> &Fragmenter {
        &self.fragmenter
    }

    /// The processing policy in use
    pub fn policy(&self) -> &ProcessingPolicy {
        &self.policy
    }

    /// Process input with automatic mode selection
    pub async fn run(&self, input: Input) -> Result<RunOutput> {
        self.run_inner(input, self.mode).await
    }

    /// Process input with a specific execution mode
    pub async fn run_with_mode(&self, input: Input, mode: ExecutionMode) -> Result<RunOutput> {
        self.run_inner(input, Some(mode)).await
    }

    /// Process a string directly (convenience method)
    pub async fn run_text(&self, text: &str) -> Result<RunOutput> {
        self.run(Input::from_text(text)).await
    }

    async fn run_inner(&self, input: Input, mode: Option<ExecutionMode>) -> Result<RunOutput> {
        let started = Instant::now();
        let text: Arc<str> = Arc::from(input.into_text()?);
        let fragments = self.fragmenter.split(&text)?;

        let mode = mode.unwrap_or_else(|| auto_select(fragments.len(), self.policy.concurrency));
        tracing::info!(
            bytes = text.len(),
            fragments = fragments.len(),
            mode = mode.as_str(),
            processor = self.processor.name(),
            "starting rewrite run"
        );

        let report = executor_for(mode)
            .execute(Batch {
                source: Arc::clone(&text),
                fragments: fragments.clone(),
                processor: Arc::clone(&self.processor),
                policy: self.policy.clone(),
            })
            .await?;

        let merged = self.reassembler.assemble(report.outcomes.clone());
        let metadata = RunMetadata::new(&report.metrics, &fragments, self, text.len(), started);

        tracing::info!(
            fallbacks = merged.fallbacks.len(),
            attempts = metadata.attempts,
            elapsed_ms = metadata.processing_time_ms,
            "rewrite run finished"
        );

        Ok(RunOutput {
            text: merged.text,
            fragments,
            outcomes: report.outcomes,
            fallbacks: merged.fallbacks,
            metadata,
        })
    }
}

/// Builder for [`RewritePipeline`]
pub struct RewritePipelineBuilder {
    processor: Arc<dyn FragmentProcessor>,
    estimator: Arc<dyn LengthEstimator>,
    fragmenter_config: FragmenterConfig,
    policy: ProcessingPolicy,
    mode: Option<ExecutionMode>,
    overlap_policy: OverlapPolicy,
}

impl RewritePipelineBuilder {
    /// Create a new builder around `processor`
    pub fn new<P: FragmentProcessor + 'static>(processor: P) -> Self {
        Self::from_shared(Arc::new(processor))
    }

    /// Create a new builder around a shared processor
    pub fn from_shared(processor: Arc<dyn FragmentProcessor>) -> Self {
        Self {
            processor,
            estimator: EstimatorKind::default().build(),
            fragmenter_config: FragmenterConfig::default(),
            policy: ProcessingPolicy::default(),
            mode: None,
            overlap_policy: OverlapPolicy::default(),
        }
    }

    /// Use one of the built-in estimators
    pub fn estimator_kind(mut self, kind: EstimatorKind) -> Self {
        self.estimator = kind.build();
        self
    }

    /// Use a custom estimator
    pub fn estimator<E: LengthEstimator + 'static>(mut self, estimator: E) -> Self {
        self.estimator = Arc::new(estimator);
        self
    }

    /// Set tiers and overlap
    pub fn fragmenter_config(mut self, config: FragmenterConfig) -> Self {
        self.fragmenter_config = config;
        self
    }

    /// Set the processing policy
    pub fn policy(mut self, policy: ProcessingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Force an execution mode instead of selecting one per run
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set how overlaps are treated on reassembly
    pub fn overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    /// Validate everything and build the pipeline
    pub fn build(self) -> Result<RewritePipeline> {
        self.policy.validate()?;
        let reassembler =
            Reassembler::new(self.overlap_policy).with_estimator(Arc::clone(&self.estimator));
        let fragmenter = Fragmenter::from_shared(self.estimator, self.fragmenter_config)?;

        Ok(RewritePipeline {
            fragmenter,
            processor: self.processor,
            policy: self.policy,
            mode: self.mode,
            reassembler,
        })
    }
}
