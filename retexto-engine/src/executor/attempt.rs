//! A single fragment's journey: pacing, timeout, retries, failure policy

use crate::{
    config::{FailurePolicy, ProcessingPolicy},
    error::{EngineError, ProcessingError, Result},
    processor::FragmentProcessor,
};
use retexto_core::{Fragment, FragmentOutcome};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces call starts at least `interval` apart across all tasks
#[derive(Debug)]
pub(crate) struct Pacer {
    interval: Option<Duration>,
    last_call: Mutex<Option<Instant>>,
}

impl Pacer {
    pub(crate) fn new(interval: Option<Duration>) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait for this call's slot. The lock is held while sleeping so
    /// waiters are released one interval apart.
    pub(crate) async fn wait(&self) {
        let Some(interval) = self.interval else {
            return;
        };

        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            tokio::time::sleep_until(previous + interval).await;
        }
        *last_call = Some(Instant::now());
    }
}

/// Final result for one fragment and how many calls it took
pub(crate) struct Attempted {
    pub result: std::result::Result<String, ProcessingError>,
    pub attempts: usize,
}

/// Call the processor until it succeeds, fails permanently, or runs out of
/// retries
pub(crate) async fn process_with_retry(
    processor: &dyn FragmentProcessor,
    text: &str,
    index: usize,
    policy: &ProcessingPolicy,
    pacer: &Pacer,
) -> Attempted {
    let max_attempts = policy.max_retries.saturating_add(1);
    let mut attempt = 1u32;

    loop {
        pacer.wait().await;

        tracing::debug!(
            index,
            attempt,
            max_attempts,
            processor = processor.name(),
            "processing fragment"
        );

        match call_once(processor, text, policy.timeout).await {
            Ok(output) => {
                return Attempted {
                    result: Ok(output),
                    attempts: attempt as usize,
                };
            }
            Err(error) => {
                tracing::warn!(
                    index,
                    attempt,
                    max_attempts,
                    error = %error,
                    "fragment attempt failed"
                );

                if !error.is_transient() || attempt >= max_attempts {
                    return Attempted {
                        result: Err(error),
                        attempts: attempt as usize,
                    };
                }

                tokio::time::sleep(policy.backoff(attempt)).await;
                attempt += 1;
            }
        }
    }
}

async fn call_once(
    processor: &dyn FragmentProcessor,
    text: &str,
    timeout: Option<Duration>,
) -> std::result::Result<String, ProcessingError> {
    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, processor.process(text))
            .await
            .map_err(|_| ProcessingError::Timeout(limit))??,
        None => processor.process(text).await?,
    };

    if output.trim().is_empty() {
        return Err(ProcessingError::EmptyOutput);
    }

    Ok(output)
}

/// Apply the failure policy to a fragment's final result
pub(crate) fn resolve(
    fragment: &Fragment,
    source: &str,
    result: std::result::Result<String, ProcessingError>,
    failure: FailurePolicy,
) -> Result<FragmentOutcome> {
    match (result, failure) {
        (Ok(text), _) => Ok(FragmentOutcome::processed(fragment, source, text)),
        (Err(error), FailurePolicy::Abort) => {
            tracing::error!(index = fragment.sequence_index, error = %error, "aborting run");
            Err(EngineError::Aborted {
                index: fragment.sequence_index,
                source: error,
            })
        }
        (Err(error), FailurePolicy::SubstituteOriginal) => {
            tracing::warn!(
                index = fragment.sequence_index,
                error = %error,
                "keeping original text for fragment"
            );
            Ok(FragmentOutcome::fallback(fragment, source, error.to_string()))
        }
    }
}
