//! Cloudflare Workers AI backend

pub mod client;
pub mod types;

pub use client::CloudflareClient;
