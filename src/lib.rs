// HTTP server modules
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sse;

// Relay collaborators
pub mod auth;
pub mod config;
pub mod title;

// Chat persistence
pub mod store;

// LLM provider layer
pub mod llm;
