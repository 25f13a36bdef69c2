//! Concurrent execution strategy
//!
//! Each fragment runs on its own tokio task; at most `policy.concurrency`
//! tasks exist at a time. Outcomes are reordered by sequence index, so
//! completion order never leaks into the output.

use crate::{
    error::Result,
    executor::{
        attempt::{process_with_retry, resolve, Pacer},
        Batch, ExecutionMode, ExecutionReport, Executor,
    },
};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;

/// Processes up to `policy.concurrency` fragments at once
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcurrentExecutor;

#[async_trait]
impl Executor for ConcurrentExecutor {
    async fn execute(&self, batch: Batch) -> Result<ExecutionReport> {
        let started = Instant::now();
        let Batch {
            source,
            fragments,
            processor,
            policy,
        } = batch;

        let concurrency = policy.concurrency.max(1);
        let pacer = Arc::new(Pacer::new(policy.pacing));
        let policy = Arc::new(policy);

        tracing::debug!(
            fragments = fragments.len(),
            concurrency,
            "starting concurrent execution"
        );

        // Tasks are spawned lazily as the buffer pulls them
        let tasks = fragments.into_iter().map(|fragment| {
            let source = Arc::clone(&source);
            let processor = Arc::clone(&processor);
            let policy = Arc::clone(&policy);
            let pacer = Arc::clone(&pacer);

            AbortOnDrop(tokio::spawn(async move {
                let attempted = process_with_retry(
                    processor.as_ref(),
                    fragment.text(&source),
                    fragment.sequence_index,
                    &policy,
                    &pacer,
                )
                .await;
                let attempts = attempted.attempts;
                resolve(&fragment, &source, attempted.result, policy.failure)
                    .map(|outcome| (outcome, attempts))
            }))
        });

        let mut completed = stream::iter(tasks).buffer_unordered(concurrency);
        let mut outcomes = Vec::new();
        let mut attempts = 0;

        // Returning early drops the stream, which aborts in-flight tasks
        while let Some(joined) = completed.next().await {
            let (outcome, calls) = joined??;
            attempts += calls;
            outcomes.push(outcome);
        }

        Ok(ExecutionReport::new(
            outcomes,
            ExecutionMode::Concurrent,
            started.elapsed(),
            attempts,
        ))
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Concurrent
    }
}

/// Join handle that aborts its task when dropped
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Future for AbortOnDrop<T> {
    type Output = std::result::Result<T, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}
