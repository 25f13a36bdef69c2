//! Execution strategies for fragment processing

use crate::{config::ProcessingPolicy, error::Result, processor::FragmentProcessor};
use async_trait::async_trait;
use retexto_core::{Fragment, FragmentOutcome};
use std::sync::Arc;
use std::time::Duration;

mod attempt;
pub mod concurrent;
pub mod sequential;

pub use concurrent::ConcurrentExecutor;
pub use sequential::SequentialExecutor;

/// Execution mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One fragment at a time, in order
    Sequential,
    /// Up to `concurrency` fragments in flight
    Concurrent,
}

impl ExecutionMode {
    /// Lowercase name for reports
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Concurrent => "concurrent",
        }
    }
}

/// Everything an executor needs for one run
#[derive(Clone)]
pub struct Batch {
    /// The source text the fragments index into
    pub source: Arc<str>,
    /// Fragments in sequence order
    pub fragments: Vec<Fragment>,
    /// The processing capability
    pub processor: Arc<dyn FragmentProcessor>,
    /// Retry, timeout, pacing and failure settings
    pub policy: ProcessingPolicy,
}

impl std::fmt::Debug for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Batch")
            .field("source_bytes", &self.source.len())
            .field("fragments", &self.fragments.len())
            .field("processor", &self.processor.name())
            .field("policy", &self.policy)
            .finish()
    }
}

/// Per-fragment outcomes in sequence order, plus run metrics
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// One outcome per fragment, sorted by sequence index
    pub outcomes: Vec<FragmentOutcome>,
    /// Measurements taken during the run
    pub metrics: ExecutionMetrics,
}

/// Measurements for one execution
#[derive(Debug, Clone)]
pub struct ExecutionMetrics {
    /// Mode that actually ran
    pub mode_used: ExecutionMode,
    /// Wall-clock time spent
    pub processing_time: Duration,
    /// Fragments with an outcome
    pub fragments_processed: usize,
    /// Processor calls made, retries included
    pub attempts: usize,
    /// Fragments that fell back to their original text
    pub fallbacks: usize,
}

impl ExecutionReport {
    pub(crate) fn new(
        mut outcomes: Vec<FragmentOutcome>,
        mode_used: ExecutionMode,
        processing_time: Duration,
        attempts: usize,
    ) -> Self {
        outcomes.sort_by_key(|outcome| outcome.sequence_index);
        let fallbacks = outcomes.iter().filter(|o| o.is_fallback()).count();

        Self {
            metrics: ExecutionMetrics {
                mode_used,
                processing_time,
                fragments_processed: outcomes.len(),
                attempts,
                fallbacks,
            },
            outcomes,
        }
    }
}

/// Pluggable execution strategy
#[async_trait]
pub trait Executor: Send + Sync {
    /// Process every fragment of the batch
    async fn execute(&self, batch: Batch) -> Result<ExecutionReport>;

    /// Get the execution mode
    fn mode(&self) -> ExecutionMode;
}

/// Executor implementing `mode`
pub fn executor_for(mode: ExecutionMode) -> Box<dyn Executor> {
    match mode {
        ExecutionMode::Sequential => Box::new(SequentialExecutor),
        ExecutionMode::Concurrent => Box::new(ConcurrentExecutor),
    }
}

/// Automatically select execution mode from the amount of work
pub fn auto_select(fragment_count: usize, concurrency: usize) -> ExecutionMode {
    if fragment_count <= 1 || concurrency <= 1 {
        ExecutionMode::Sequential
    } else {
        ExecutionMode::Concurrent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_select() {
        assert_eq!(auto_select(0, 8), ExecutionMode::Sequential);
        assert_eq!(auto_select(1, 8), ExecutionMode::Sequential);
        assert_eq!(auto_select(10, 1), ExecutionMode::Sequential);
        assert_eq!(auto_select(10, 4), ExecutionMode::Concurrent);
    }

    #[test]
    fn test_executor_for() {
        assert_eq!(
            executor_for(ExecutionMode::Concurrent).mode(),
            ExecutionMode::Concurrent
        );
        assert_eq!(
            executor_for(ExecutionMode::Sequential).mode(),
            ExecutionMode::Sequential
        );
    }
}
