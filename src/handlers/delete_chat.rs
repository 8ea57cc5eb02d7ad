//! DELETE /api/chat handler

use std::collections::HashMap;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::bearer_token;

use super::{ApiError, AppState};

pub async fn delete_chat_handler(
    authorization: Option<String>,
    query: HashMap<String, String>,
    state: AppState,
) -> Result<impl warp::Reply, warp::Rejection> {
    // Missing or unparseable id is a 404, before any auth work
    let chat_id = query
        .get("id")
        .and_then(|id| id.parse::<Uuid>().ok())
        .ok_or_else(|| ApiError::NotFound.reject())?;

    let session = state
        .sessions
        .resolve(authorization.as_deref().and_then(bearer_token))
        .await
        .ok_or_else(|| ApiError::Unauthorized.reject())?;

    info!(%chat_id, user = %session.user_id, "DELETE /api/chat");

    let chat = state.store.get_chat(chat_id).await.map_err(|e| {
        error!(%chat_id, error = %e, "Chat lookup failed");
        ApiError::Persistence.reject()
    })?;

    // Absent and foreign-owned chats are indistinguishable to the caller
    match chat {
        Some(chat) if chat.user_id == session.user_id => {}
        _ => {
            warn!(%chat_id, user = %session.user_id, "Delete refused");
            return Err(ApiError::Unauthorized.reject());
        }
    }

    state.store.delete_chat(chat_id).await.map_err(|e| {
        error!(%chat_id, error = %e, "Chat deletion failed");
        ApiError::Persistence.reject()
    })?;

    Ok(warp::reply::with_status(
        "Chat deleted",
        warp::http::StatusCode::OK,
    ))
}
