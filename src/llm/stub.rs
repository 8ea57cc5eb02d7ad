//! Stub provider for tests and credential-less runs
//!
//! The test-side implementation of the provider strategy: returns canned
//! completions, counts upstream calls, and can be switched into a failure
//! mode to exercise the relay's error paths.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::core::{
    error::LlmError,
    provider::{ChatProvider, TokenStream},
    types::{Completion, CompletionRequest, TokenChunk},
};

/// Canned-response provider
pub struct StubProvider {
    response: String,
    reasoning: Option<String>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl StubProvider {
    /// Provider that answers every request with `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            reasoning: None,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Attach canned reasoning text to every completion
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Provider that fails every request with an upstream error
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            reasoning: None,
            fail: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle for asserting how many upstream calls were made
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    fn record_call(&self) -> Result<(), LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LlmError::HttpError {
                status: 503,
                body: "stub upstream unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChatProvider for StubProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<Completion, LlmError> {
        self.record_call()?;
        Ok(Completion {
            text: self.response.clone(),
            reasoning: self.reasoning.clone(),
        })
    }

    async fn stream(&self, _request: CompletionRequest) -> Result<TokenStream, LlmError> {
        self.record_call()?;

        let mut events = Vec::new();
        if let Some(reasoning) = self.reasoning.clone() {
            events.push(Ok(TokenChunk::Reasoning { text: reasoning }));
        }
        // Chunk the canned answer per word so streaming consumers see
        // multiple deltas
        for word in self.response.split_inclusive(' ') {
            events.push(Ok(TokenChunk::Text {
                text: word.to_string(),
            }));
        }
        events.push(Ok(TokenChunk::Done));

        Ok(Box::pin(futures::stream::iter(events)))
    }

    fn resolve_model(&self, selector: Option<&str>) -> String {
        selector.unwrap_or("stub-model").to_string()
    }
}
