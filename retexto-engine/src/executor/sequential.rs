//! Sequential execution strategy

use crate::{
    error::Result,
    executor::{
        attempt::{process_with_retry, resolve, Pacer},
        Batch, ExecutionMode, ExecutionReport, Executor,
    },
};
use async_trait::async_trait;
use tokio::time::Instant;

/// Processes fragments one after another
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

#[async_trait]
impl Executor for SequentialExecutor {
    async fn execute(&self, batch: Batch) -> Result<ExecutionReport> {
        let started = Instant::now();
        let pacer = Pacer::new(batch.policy.pacing);
        let mut outcomes = Vec::with_capacity(batch.fragments.len());
        let mut attempts = 0;

        for fragment in &batch.fragments {
            let attempted = process_with_retry(
                batch.processor.as_ref(),
                fragment.text(&batch.source),
                fragment.sequence_index,
                &batch.policy,
                &pacer,
            )
            .await;

            attempts += attempted.attempts;
            outcomes.push(resolve(
                fragment,
                &batch.source,
                attempted.result,
                batch.policy.failure,
            )?);
        }

        Ok(ExecutionReport::new(
            outcomes,
            ExecutionMode::Sequential,
            started.elapsed(),
            attempts,
        ))
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }
}
