//! Resilient AI Provider - bounded timeout and a single retry.
//!
//! Wraps any provider so that every attempt is cut off after a fixed
//! timeout, and a retryable failure (timeouts included) gets exactly
//! `max_retries` more attempts before the error reaches the caller.
//!
//! # Example
//!
//! ```ignore
//! let provider = ResilientProvider::new(GeminiProvider::new(config)?)
//!     .with_timeout(Duration::from_secs(60))
//!     .with_max_retries(1);
//! ```

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// AI provider wrapper enforcing a timeout per attempt and bounded retries.
pub struct ResilientProvider<P: AIProvider> {
    inner: P,
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
}

impl<P: AIProvider> ResilientProvider<P> {
    /// Wraps `inner` with a 60s timeout and one retry.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            timeout: Duration::from_secs(60),
            max_retries: 1,
            backoff: Duration::from_millis(500),
        }
    }

    /// Sets the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many extra attempts a retryable failure gets.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the pause between attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns the wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    async fn attempt(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        match timeout(self.timeout, self.inner.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(AIError::timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl<P: AIProvider> AIProvider for ResilientProvider<P> {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let mut attempt = 0;
        loop {
            match self.attempt(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        trace_id = %request.metadata.trace_id,
                        attempt,
                        error = %err,
                        "Language model call failed, retrying"
                    );
                    if !self.backoff.is_zero() {
                        sleep(self.backoff).await;
                    }
                }
                Err(err) => {
                    tracing::error!(
                        trace_id = %request.metadata.trace_id,
                        attempts = attempt + 1,
                        error = %err,
                        "Language model call failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        self.inner.estimate_tokens(text)
    }

    fn provider_info(&self) -> ProviderInfo {
        self.inner.provider_info()
    }
}
