//! Processing policy for a rewriting run

use crate::error::{EngineError, Result};
use std::time::Duration;

/// What to do when a fragment cannot be processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run and report the failed fragment
    Abort,
    /// Keep the fragment's original text and continue
    #[default]
    SubstituteOriginal,
}

/// Retry, timeout, pacing and concurrency settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingPolicy {
    /// Failure handling once retries are exhausted
    pub failure: FailurePolicy,
    /// Extra attempts after the first one, for transient errors only
    pub max_retries: u32,
    /// Backoff before retry `n` is `base_backoff * 2^(n-1)`
    pub base_backoff: Duration,
    /// Per-call timeout (None = wait indefinitely)
    pub timeout: Option<Duration>,
    /// Minimum spacing between call starts, shared by all tasks
    pub pacing: Option<Duration>,
    /// Maximum calls in flight
    pub concurrency: usize,
}

impl Default for ProcessingPolicy {
    fn default() -> Self {
        Self {
            failure: FailurePolicy::SubstituteOriginal,
            max_retries: 2,
            base_backoff: Duration::from_millis(100),
            timeout: Some(Duration::from_secs(60)),
            pacing: None,
            concurrency: 4,
        }
    }
}

impl ProcessingPolicy {
    /// One call at a time, spaced by `pacing`; suits strictly rate-limited
    /// services
    pub fn paced(pacing: Duration) -> Self {
        Self {
            pacing: Some(pacing),
            concurrency: 1,
            ..Self::default()
        }
    }

    /// Abort on the first failure, without retries
    pub fn strict() -> Self {
        Self {
            failure: FailurePolicy::Abort,
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Set the failure policy
    pub fn with_failure(mut self, failure: FailurePolicy) -> Self {
        self.failure = failure;
        self
    }

    /// Set the number of retries
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base backoff
    pub fn with_backoff(mut self, base_backoff: Duration) -> Self {
        self.base_backoff = base_backoff;
        self
    }

    /// Set or clear the per-call timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set or clear the pacing delay
    pub fn with_pacing(mut self, pacing: Option<Duration>) -> Self {
        self.pacing = pacing;
        self
    }

    /// Set the concurrency bound
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Backoff before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_backoff
            .saturating_mul(2u32.saturating_pow(retry.saturating_sub(1)))
    }

    /// Reject settings under which no call could be made
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(EngineError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(EngineError::Config(
                "timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
