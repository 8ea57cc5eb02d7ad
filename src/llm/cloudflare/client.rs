//! Cloudflare Workers AI client implementation

use async_trait::async_trait;
use reqwest::Client;

use crate::llm::core::{
    error::LlmError,
    provider::{ChatProvider, TokenStream},
    types::{ChatMessage, Completion, CompletionRequest, TokenChunk},
};
use crate::llm::reasoning::split_reasoning;

use super::types::{CloudflareRequest, CloudflareResponse};

const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Client for the Cloudflare Workers AI model-run API
///
/// Workers AI returns the whole completion in one envelope; the `stream`
/// trait method adapts that single response into chunked events so the relay
/// can treat both backends uniformly.
pub struct CloudflareClient {
    http_client: Client,
    account_id: String,
    api_token: String,
    base_url: String,
}

impl CloudflareClient {
    /// Create a new Workers AI client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(account_id: String, api_token: String) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            account_id,
            api_token,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL (integration tests against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn run_url(&self, model: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url, self.account_id, model
        )
    }
}

#[async_trait]
impl ChatProvider for CloudflareClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        // No dedicated system field; prepend it as a message
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = request.system {
            messages.push(ChatMessage::system(system));
        }
        messages.extend(request.messages);

        let body = CloudflareRequest {
            messages,
            max_tokens: request.max_tokens,
        };

        let response = self
            .http_client
            .post(self.run_url(&request.model))
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            return Err(LlmError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CloudflareResponse = response.json().await?;

        if !parsed.success {
            let error = parsed.errors.into_iter().next();
            return Err(match error {
                Some(e) => LlmError::ProviderError {
                    code: e.code.to_string(),
                    message: e.message,
                },
                None => LlmError::StreamError("Run reported failure without errors".to_string()),
            });
        }

        let raw_text = parsed
            .result
            .and_then(|r| r.response)
            .ok_or_else(|| LlmError::StreamError("Run result contained no response".to_string()))?;

        // DeepSeek-R1 distill models inline their reasoning as a <think> prefix
        let (reasoning, text) = split_reasoning(&raw_text);
        Ok(Completion { text, reasoning })
    }

    async fn stream(&self, request: CompletionRequest) -> Result<TokenStream, LlmError> {
        let completion = self.complete(request).await?;

        let mut events = Vec::new();
        if let Some(reasoning) = completion.reasoning {
            events.push(Ok(TokenChunk::Reasoning { text: reasoning }));
        }
        if !completion.text.is_empty() {
            events.push(Ok(TokenChunk::Text {
                text: completion.text,
            }));
        }
        events.push(Ok(TokenChunk::Done));

        Ok(Box::pin(futures::stream::iter(events)))
    }

    fn resolve_model(&self, selector: Option<&str>) -> String {
        match selector {
            Some("title-model") => "@cf/meta/llama-3.1-8b-instruct",
            // All chat selectors map to the reasoning distill the account runs
            _ => "@cf/deepseek-ai/deepseek-r1-distill-qwen-32b",
        }
        .to_string()
    }
}
