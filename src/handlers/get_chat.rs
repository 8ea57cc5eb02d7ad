//! GET /api/chat handler

use std::collections::HashMap;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::bearer_token;
use crate::models::ChatHistoryResponse;

use super::{ApiError, AppState};

/// Read back a conversation and its messages in insertion order
pub async fn get_chat_handler(
    authorization: Option<String>,
    query: HashMap<String, String>,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    let chat_id = query
        .get("id")
        .and_then(|id| id.parse::<Uuid>().ok())
        .ok_or_else(|| ApiError::NotFound.reject())?;

    let session = state
        .sessions
        .resolve(authorization.as_deref().and_then(bearer_token))
        .await
        .ok_or_else(|| ApiError::Unauthorized.reject())?;

    info!(%chat_id, user = %session.user_id, "GET /api/chat");

    let chat = state.store.get_chat(chat_id).await.map_err(|e| {
        error!(%chat_id, error = %e, "Chat lookup failed");
        ApiError::Persistence.reject()
    })?;

    // Same rule as delete: absent and foreign-owned look identical
    let chat = match chat {
        Some(chat) if chat.user_id == session.user_id => chat,
        _ => return Err(ApiError::Unauthorized.reject()),
    };

    let messages = state.store.get_messages(chat_id).await.map_err(|e| {
        error!(%chat_id, error = %e, "Message lookup failed");
        ApiError::Persistence.reject()
    })?;

    Ok(warp::reply::json(&ChatHistoryResponse { chat, messages }))
}
