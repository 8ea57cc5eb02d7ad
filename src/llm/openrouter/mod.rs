//! OpenRouter backend
//!
//! Client for the OpenRouter chat-completions API, with SSE token streaming
//! and reasoning deltas for models that expose them.

pub mod client;
pub mod sse;
pub mod types;

pub use client::OpenRouterClient;
