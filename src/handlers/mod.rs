//! Request handlers for the relay API

pub mod delete_chat;
pub mod get_chat;
pub mod send_message;

use std::sync::Arc;

use crate::auth::SessionResolver;
use crate::llm::ChatProvider;
use crate::store::ChatStore;

pub use delete_chat::delete_chat_handler;
pub use get_chat::get_chat_handler;
pub use send_message::send_message_handler;

/// Shared handler state, assembled once at startup and injected per request
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ChatProvider>,
    pub store: Arc<dyn ChatStore>,
    pub sessions: Arc<dyn SessionResolver>,
    pub system_prompt: String,
}

/// Errors surfaced to the client, mapped to HTTP statuses in `routes`
///
/// Upstream and persistence failures deliberately carry no detail; the
/// specifics go to the server log only.
#[derive(Debug)]
pub enum ApiError {
    /// No session, or session does not own the chat
    Unauthorized,
    /// Missing or malformed input
    BadRequest(String),
    /// Resource or required parameter absent
    NotFound,
    /// Inference API failed
    Upstream,
    /// Store failed on a fatal path (create, delete, read)
    Persistence,
}

impl warp::reject::Reject for ApiError {}

impl ApiError {
    pub fn reject(self) -> warp::Rejection {
        warp::reject::custom(self)
    }
}
