//! OpenRouter client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;

use crate::llm::core::{
    error::LlmError,
    provider::{ChatProvider, TokenStream},
    types::{ChatMessage, Completion, CompletionRequest, TokenChunk},
};
use crate::llm::reasoning::split_reasoning;

use super::sse::parse_sse_stream;
use super::types::{OpenRouterRequest, OpenRouterResponse};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Client for the OpenRouter chat-completions API
pub struct OpenRouterClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenRouterClient {
    /// Create a new OpenRouter client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL (integration tests against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// OpenRouter has no dedicated system field; prepend it as a message.
    fn build_body(&self, request: CompletionRequest, stream: bool) -> OpenRouterRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = request.system {
            messages.push(ChatMessage::system(system));
        }
        messages.extend(request.messages);

        OpenRouterRequest {
            model: request.model,
            messages,
            max_tokens: request.max_tokens,
            stream,
        }
    }

    async fn send(&self, body: &OpenRouterRequest) -> Result<reqwest::Response, LlmError> {
        let response = self
            .http_client
            .post(self.endpoint_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
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

        Ok(response)
    }
}

#[async_trait]
impl ChatProvider for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError> {
        let body = self.build_body(request, false);
        let response = self.send(&body).await?;
        let parsed: OpenRouterResponse = response.json().await?;

        if let Some(error) = parsed.error {
            return Err(LlmError::ProviderError {
                code: error
                    .code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
                message: error.message,
            });
        }

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::StreamError("Response contained no choices".to_string()))?;

        let raw_text = choice.message.content.unwrap_or_default();
        // Prefer the tagged reasoning field; fall back to <think> extraction
        // for models that inline it.
        match choice.message.reasoning {
            Some(reasoning) if !reasoning.is_empty() => Ok(Completion {
                text: raw_text,
                reasoning: Some(reasoning),
            }),
            _ => {
                let (reasoning, text) = split_reasoning(&raw_text);
                Ok(Completion { text, reasoning })
            }
        }
    }

    async fn stream(&self, request: CompletionRequest) -> Result<TokenStream, LlmError> {
        let body = self.build_body(request, true);
        let response = self.send(&body).await?;

        let byte_stream = response.bytes_stream();
        let sse_stream = parse_sse_stream(Box::pin(byte_stream));

        let token_stream = sse_stream.flat_map(|result| {
            let events: Vec<Result<TokenChunk, LlmError>> = match result {
                Ok(chunk) => {
                    if let Some(error) = chunk.error {
                        vec![Err(LlmError::ProviderError {
                            code: error
                                .code
                                .map(|c| c.to_string())
                                .unwrap_or_else(|| "unknown".to_string()),
                            message: error.message,
                        })]
                    } else {
                        let mut events = Vec::new();
                        for choice in chunk.choices {
                            if let Some(text) = choice.delta.reasoning {
                                if !text.is_empty() {
                                    events.push(Ok(TokenChunk::Reasoning { text }));
                                }
                            }
                            if let Some(text) = choice.delta.content {
                                if !text.is_empty() {
                                    events.push(Ok(TokenChunk::Text { text }));
                                }
                            }
                            if choice.finish_reason.is_some() {
                                events.push(Ok(TokenChunk::Done));
                            }
                        }
                        events
                    }
                }
                Err(e) => vec![Err(e)],
            };
            futures::stream::iter(events)
        });

        Ok(Box::pin(token_stream))
    }

    fn resolve_model(&self, selector: Option<&str>) -> String {
        match selector {
            Some("chat-model-large") => "openai/gpt-4o",
            Some("chat-model-reasoning") => "deepseek/deepseek-r1-zero:free",
            Some("title-model") => "openai/gpt-4o-mini",
            // Unknown selectors and "chat-model-small" use the default
            _ => "openai/gpt-4o-mini",
        }
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let client = OpenRouterClient::new("sk-or-test".to_string()).unwrap();
        assert_eq!(
            client.endpoint_url(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_base_url_override() {
        let client = OpenRouterClient::new("sk-or-test".to_string())
            .unwrap()
            .with_base_url("http://127.0.0.1:8080/v1");
        assert_eq!(client.endpoint_url(), "http://127.0.0.1:8080/v1/chat/completions");
    }

    #[test]
    fn test_system_prompt_prepended() {
        let client = OpenRouterClient::new("sk-or-test".to_string()).unwrap();
        let request = CompletionRequest::new(
            "openai/gpt-4o-mini",
            vec![ChatMessage::user("hi")],
        )
        .with_system("Be brief");

        let body = client.build_body(request, false);
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[0].content, "Be brief");
        assert_eq!(body.messages[1].content, "hi");
    }

    #[test]
    fn test_resolve_model() {
        let client = OpenRouterClient::new("sk-or-test".to_string()).unwrap();
        assert_eq!(
            client.resolve_model(Some("chat-model-reasoning")),
            "deepseek/deepseek-r1-zero:free"
        );
        assert_eq!(client.resolve_model(Some("chat-model-large")), "openai/gpt-4o");
        assert_eq!(client.resolve_model(None), "openai/gpt-4o-mini");
        assert_eq!(client.resolve_model(Some("bogus")), "openai/gpt-4o-mini");
    }
}
