//! Provider trait and factory for inference backends

use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

use super::{
    error::LlmError,
    types::{Completion, CompletionRequest, TokenChunk},
};
use crate::llm::cloudflare::CloudflareClient;
use crate::llm::openrouter::OpenRouterClient;

/// Stream of incremental completion events
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<TokenChunk, LlmError>> + Send>>;

/// Main interface all inference backend implementations must satisfy
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generate a full completion in one call
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, LlmError>;

    /// Generate a completion as a stream of token chunks
    ///
    /// Dropping the returned stream cancels the upstream request.
    async fn stream(&self, request: CompletionRequest) -> Result<TokenStream, LlmError>;

    /// Map a client-facing model selector to a backend model identifier
    ///
    /// Unknown or absent selectors fall back to the backend's default chat model.
    fn resolve_model(&self, selector: Option<&str>) -> String;
}

/// Credentials for the selected inference backend
///
/// Built once at startup from the environment and injected into the factory;
/// request handlers never read credentials themselves.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// OpenRouter chat-completions API
    OpenRouter { api_key: String },
    /// Cloudflare Workers AI model-run API
    Cloudflare {
        account_id: String,
        api_token: String,
    },
}

impl BackendConfig {
    /// Backend name for logs
    pub fn name(&self) -> &'static str {
        match self {
            BackendConfig::OpenRouter { .. } => "openrouter",
            BackendConfig::Cloudflare { .. } => "cloudflare",
        }
    }
}

/// Create a chat provider for the configured backend
///
/// # Errors
///
/// Returns an error if the underlying HTTP client cannot be constructed.
pub fn create_provider(config: BackendConfig) -> Result<Box<dyn ChatProvider>, LlmError> {
    match config {
        BackendConfig::OpenRouter { api_key } => {
            let client = OpenRouterClient::new(api_key)?;
            Ok(Box::new(client))
        }
        BackendConfig::Cloudflare {
            account_id,
            api_token,
        } => {
            let client = CloudflareClient::new(account_id, api_token)?;
            Ok(Box::new(client))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config_name() {
        let config = BackendConfig::OpenRouter {
            api_key: "sk-or-test".to_string(),
        };
        assert_eq!(config.name(), "openrouter");

        let config = BackendConfig::Cloudflare {
            account_id: "acct".to_string(),
            api_token: "token".to_string(),
        };
        assert_eq!(config.name(), "cloudflare");
    }

    #[test]
    fn test_create_provider_openrouter() {
        let provider = create_provider(BackendConfig::OpenRouter {
            api_key: "sk-or-test".to_string(),
        })
        .unwrap();
        assert_eq!(
            provider.resolve_model(Some("chat-model-small")),
            "openai/gpt-4o-mini"
        );
    }

    #[test]
    fn test_create_provider_cloudflare() {
        let provider = create_provider(BackendConfig::Cloudflare {
            account_id: "acct".to_string(),
            api_token: "token".to_string(),
        })
        .unwrap();
        assert!(provider.resolve_model(None).starts_with("@cf/"));
    }
}
