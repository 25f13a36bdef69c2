//! The fragment processing boundary
//!
//! A [`FragmentProcessor`] turns one fragment into its rewritten form. In
//! production it wraps a remote text-generation service; the engine treats
//! it as an opaque call that takes time and may fail.

use crate::error::ProcessingError;
use async_trait::async_trait;
use retexto_core::PunctuationReconstructor;
use std::future::Future;
use std::sync::Arc;

/// Rewrites a single fragment
#[async_trait]
pub trait FragmentProcessor: Send + Sync {
    /// Process one fragment's text
    async fn process(&self, fragment: &str) -> Result<String, ProcessingError>;

    /// Short identifier used in logs and reports
    fn name(&self) -> &str {
        "custom"
    }
}

#[async_trait]
impl<T: FragmentProcessor + ?Sized> FragmentProcessor for Arc<T> {
    async fn process(&self, fragment: &str) -> Result<String, ProcessingError> {
        (**self).process(fragment).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Returns every fragment unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityProcessor;

#[async_trait]
impl FragmentProcessor for IdentityProcessor {
    async fn process(&self, fragment: &str) -> Result<String, ProcessingError> {
        Ok(fragment.to_string())
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Restores punctuation locally, without a remote service
#[derive(Debug, Clone)]
pub struct PunctuationProcessor {
    reconstructor: Arc<PunctuationReconstructor>,
}

impl PunctuationProcessor {
    /// Wrap a reconstructor
    pub fn new(reconstructor: PunctuationReconstructor) -> Self {
        Self {
            reconstructor: Arc::new(reconstructor),
        }
    }

    /// Processor for an embedded language
    pub fn for_language(code: &str) -> retexto_core::Result<Self> {
        PunctuationReconstructor::for_language(code).map(Self::new)
    }
}

#[async_trait]
impl FragmentProcessor for PunctuationProcessor {
    async fn process(&self, fragment: &str) -> Result<String, ProcessingError> {
        Ok(self.reconstructor.reconstruct(fragment))
    }

    fn name(&self) -> &str {
        "punctuate"
    }
}

/// Adapts an async closure, e.g. a client call to a rewriting API
pub struct FnProcessor<F> {
    name: String,
    f: F,
}

impl<F, Fut> FnProcessor<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, ProcessingError>> + Send,
{
    /// Create a processor named `name` around `f`
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> std::fmt::Debug for FnProcessor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProcessor").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F, Fut> FragmentProcessor for FnProcessor<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, ProcessingError>> + Send,
{
    async fn process(&self, fragment: &str) -> Result<String, ProcessingError> {
        (self.f)(fragment.to_string()).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
