//! LLM provider layer
//!
//! This module provides a unified interface for forwarding chat messages to
//! hosted inference APIs. Two backends are implemented: OpenRouter's
//! chat-completions endpoint (with SSE token streaming and reasoning deltas)
//! and Cloudflare Workers AI's model-run endpoint.

pub mod cloudflare;
pub mod core;
pub mod openrouter;
pub mod reasoning;
pub mod stub;

// Re-export commonly used types
pub use core::{
    error::LlmError,
    provider::{create_provider, BackendConfig, ChatProvider, TokenStream},
    types::{ChatMessage, Completion, CompletionRequest, Role, TokenChunk},
};
