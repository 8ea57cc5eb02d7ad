//! Process configuration
//!
//! Read from the environment exactly once at startup and injected into the
//! server. Request handlers never touch the environment, and missing
//! credentials fail loudly before the first request instead of mid-stream.

use std::collections::HashMap;
use std::net::SocketAddr;
use thiserror::Error;

use crate::llm::BackendConfig;

/// Configuration errors
///
/// Messages name the offending variable, never its value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}

/// Relay configuration assembled from the environment
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Selected inference backend with its credentials
    pub backend: BackendConfig,
    /// Listen address for the HTTP server
    pub bind_addr: SocketAddr,
    /// Postgres connection string; in-memory store when absent
    pub database_url: Option<String>,
    /// Bearer-token to user-id map for the session resolver
    pub api_tokens: HashMap<String, String>,
    /// System prompt sent with each chat completion
    pub system_prompt: String,
}

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3030";
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a friendly assistant. Keep your responses concise and helpful.";

impl RelayConfig {
    /// Build configuration from process environment variables
    ///
    /// Recognized variables: `CHAT_BACKEND` (`openrouter` | `cloudflare`,
    /// default `openrouter`), `OPENROUTER_API_KEY`, `CLOUDFLARE_API_TOKEN`,
    /// `CLOUDFLARE_ACCOUNT_ID` (or the legacy
    /// `NEXT_PUBLIC_CLOUDFLARE_ACCOUNT_ID`), `DATABASE_URL`,
    /// `CHAT_API_TOKENS`, `BIND_ADDR`, `SYSTEM_PROMPT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup (tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend_name = lookup("CHAT_BACKEND").unwrap_or_else(|| "openrouter".to_string());

        let backend = match backend_name.as_str() {
            "openrouter" => {
                let api_key = lookup("OPENROUTER_API_KEY")
                    .filter(|v| !v.is_empty())
                    .ok_or(ConfigError::MissingVar("OPENROUTER_API_KEY"))?;
                BackendConfig::OpenRouter { api_key }
            }
            "cloudflare" => {
                let api_token = lookup("CLOUDFLARE_API_TOKEN")
                    .filter(|v| !v.is_empty())
                    .ok_or(ConfigError::MissingVar("CLOUDFLARE_API_TOKEN"))?;
                let account_id = lookup("CLOUDFLARE_ACCOUNT_ID")
                    .or_else(|| lookup("NEXT_PUBLIC_CLOUDFLARE_ACCOUNT_ID"))
                    .filter(|v| !v.is_empty())
                    .ok_or(ConfigError::MissingVar("CLOUDFLARE_ACCOUNT_ID"))?;
                BackendConfig::Cloudflare {
                    account_id,
                    api_token,
                }
            }
            other => {
                return Err(ConfigError::InvalidVar {
                    name: "CHAT_BACKEND",
                    reason: format!("unknown backend '{}'", other),
                })
            }
        };

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidVar {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let api_tokens = lookup("CHAT_API_TOKENS")
            .map(|spec| parse_token_spec(&spec))
            .unwrap_or_default();

        Ok(Self {
            backend,
            bind_addr,
            database_url: lookup("DATABASE_URL").filter(|v| !v.is_empty()),
            api_tokens,
            system_prompt: lookup("SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        })
    }
}

fn parse_token_spec(spec: &str) -> HashMap<String, String> {
    spec.split(',')
        .filter_map(|pair| {
            let (token, user) = pair.trim().split_once(':')?;
            if token.is_empty() || user.is_empty() {
                return None;
            }
            Some((token.to_string(), user.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_openrouter_backend() {
        let config =
            RelayConfig::from_lookup(env(&[("OPENROUTER_API_KEY", "sk-or-test")])).unwrap();
        assert!(matches!(config.backend, BackendConfig::OpenRouter { .. }));
        assert_eq!(config.bind_addr.port(), 3030);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_missing_openrouter_key() {
        let err = RelayConfig::from_lookup(env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("OPENROUTER_API_KEY")));
    }

    #[test]
    fn test_cloudflare_backend() {
        let config = RelayConfig::from_lookup(env(&[
            ("CHAT_BACKEND", "cloudflare"),
            ("CLOUDFLARE_API_TOKEN", "cf-token"),
            ("CLOUDFLARE_ACCOUNT_ID", "acct-1"),
        ]))
        .unwrap();
        assert!(matches!(config.backend, BackendConfig::Cloudflare { .. }));
    }

    #[test]
    fn test_cloudflare_legacy_account_id_name() {
        let config = RelayConfig::from_lookup(env(&[
            ("CHAT_BACKEND", "cloudflare"),
            ("CLOUDFLARE_API_TOKEN", "cf-token"),
            ("NEXT_PUBLIC_CLOUDFLARE_ACCOUNT_ID", "acct-1"),
        ]))
        .unwrap();
        match config.backend {
            BackendConfig::Cloudflare { account_id, .. } => assert_eq!(account_id, "acct-1"),
            _ => panic!("Expected Cloudflare backend"),
        }
    }

    #[test]
    fn test_missing_cloudflare_credentials() {
        let err = RelayConfig::from_lookup(env(&[("CHAT_BACKEND", "cloudflare")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("CLOUDFLARE_API_TOKEN")));
    }

    #[test]
    fn test_unknown_backend() {
        let err = RelayConfig::from_lookup(env(&[("CHAT_BACKEND", "ollama")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidVar { name: "CHAT_BACKEND", .. }
        ));
    }

    #[test]
    fn test_error_never_contains_credential() {
        // Empty value is treated as missing; the message names the variable only
        let err = RelayConfig::from_lookup(env(&[("OPENROUTER_API_KEY", "")])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("OPENROUTER_API_KEY"));
        assert!(!message.contains("sk-"));
    }

    #[test]
    fn test_api_token_spec() {
        let config = RelayConfig::from_lookup(env(&[
            ("OPENROUTER_API_KEY", "sk-or-test"),
            ("CHAT_API_TOKENS", "tok-a:alice,tok-b:bob"),
        ]))
        .unwrap();
        assert_eq!(config.api_tokens.get("tok-a").map(String::as_str), Some("alice"));
        assert_eq!(config.api_tokens.len(), 2);
    }

    #[test]
    fn test_bind_addr_override() {
        let config = RelayConfig::from_lookup(env(&[
            ("OPENROUTER_API_KEY", "sk-or-test"),
            ("BIND_ADDR", "0.0.0.0:8080"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);

        let err = RelayConfig::from_lookup(env(&[
            ("OPENROUTER_API_KEY", "sk-or-test"),
            ("BIND_ADDR", "not-an-addr"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { name: "BIND_ADDR", .. }));
    }
}
