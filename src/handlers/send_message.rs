//! POST /api/chat handler

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info, warn};
use uuid::Uuid;
use warp::reply::Reply;

use crate::auth::bearer_token;
use crate::llm::{CompletionRequest, Role, TokenChunk};
use crate::models::{ChatResponse, SendMessageRequest};
use crate::sse::{create_done_event, create_error_event, create_reasoning_event, create_text_event};
use crate::store::{Chat, StoredMessage};
use crate::title::generate_title;

use super::{ApiError, AppState};

pub async fn send_message_handler(
    authorization: Option<String>,
    request: SendMessageRequest,
    state: AppState,
) -> Result<warp::reply::Response, warp::Rejection> {
    let session = state
        .sessions
        .resolve(authorization.as_deref().and_then(bearer_token))
        .await
        .ok_or_else(|| ApiError::Unauthorized.reject())?;

    let user_content = request
        .most_recent_user_message()
        .ok_or_else(|| ApiError::BadRequest("No user message found".to_string()).reject())?;

    let chat_id = request.id.unwrap_or_else(Uuid::new_v4);
    info!(%chat_id, user = %session.user_id, "POST /api/chat");

    // Ownership check before any upstream call
    let existing = state.store.get_chat(chat_id).await.map_err(|e| {
        error!(%chat_id, error = %e, "Chat lookup failed");
        ApiError::Persistence.reject()
    })?;

    match existing {
        Some(chat) if chat.user_id != session.user_id => {
            warn!(%chat_id, user = %session.user_id, "Chat owned by another user");
            return Err(ApiError::Unauthorized.reject());
        }
        Some(_) => {}
        None => {
            let title = generate_title(state.provider.as_ref(), &user_content).await;
            state
                .store
                .create_chat(Chat::new(chat_id, session.user_id.clone(), title))
                .await
                .map_err(|e| {
                    error!(%chat_id, error = %e, "Chat creation failed");
                    ApiError::Persistence.reject()
                })?;
        }
    }

    // Best-effort: the user still gets an answer if this write fails
    if let Err(e) = state
        .store
        .save_messages(vec![StoredMessage::new(chat_id, Role::User, &user_content)])
        .await
    {
        warn!(%chat_id, error = %e, "Failed to save user message");
    }

    let completion_request = CompletionRequest::new(
        state
            .provider
            .resolve_model(request.selected_chat_model.as_deref()),
        request.history(),
    )
    .with_system(state.system_prompt.clone());

    if request.stream {
        stream_response(state, chat_id, completion_request).await
    } else {
        json_response(state, chat_id, completion_request).await
    }
}

/// Single-body variant: one completion, one JSON reply
async fn json_response(
    state: AppState,
    chat_id: Uuid,
    request: CompletionRequest,
) -> Result<warp::reply::Response, warp::Rejection> {
    let completion = state.provider.complete(request).await.map_err(|e| {
        error!(%chat_id, error = %e, "Upstream inference call failed");
        ApiError::Upstream.reject()
    })?;

    save_assistant_message(&state, chat_id, &completion.text).await;

    let body = ChatResponse {
        id: chat_id,
        response: completion.text,
        reasoning: completion.reasoning,
    };
    Ok(warp::reply::json(&body).into_response())
}

/// Streaming variant: forward token chunks as SSE as they arrive
///
/// A spawned producer task drives the upstream token stream and persists
/// the assistant message; events reach the client through a channel. When
/// the client disconnects the receiver drops, the sends fail, and the
/// producer exits, cancelling the upstream request.
async fn stream_response(
    state: AppState,
    chat_id: Uuid,
    request: CompletionRequest,
) -> Result<warp::reply::Response, warp::Rejection> {
    let mut token_stream = state.provider.stream(request).await.map_err(|e| {
        error!(%chat_id, error = %e, "Upstream inference call failed");
        ApiError::Upstream.reject()
    })?;

    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(async move {
        let mut answer = String::new();
        let mut finished = false;

        while let Some(result) = token_stream.next().await {
            match result {
                Ok(TokenChunk::Reasoning { text }) => {
                    if tx.send(create_reasoning_event(text)).await.is_err() {
                        break;
                    }
                }
                Ok(TokenChunk::Text { text }) => {
                    answer.push_str(&text);
                    if tx.send(create_text_event(text)).await.is_err() {
                        break;
                    }
                }
                Ok(TokenChunk::Done) => {
                    finished = true;
                    save_assistant_message(&state, chat_id, &answer).await;
                    let _ = tx.send(create_done_event()).await;
                    break;
                }
                Err(e) => {
                    error!(%chat_id, error = %e, "Upstream stream failed");
                    let _ = tx.send(create_error_event()).await;
                    break;
                }
            }
        }

        // Upstream closed without a terminal chunk; keep what arrived
        if !finished && !answer.is_empty() {
            save_assistant_message(&state, chat_id, &answer).await;
            let _ = tx.send(create_done_event()).await;
        }
    });

    let event_stream = ReceiverStream::new(rx);
    Ok(warp::sse::reply(warp::sse::keep_alive().stream(event_stream)).into_response())
}

async fn save_assistant_message(state: &AppState, chat_id: Uuid, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Err(e) = state
        .store
        .save_messages(vec![StoredMessage::new(chat_id, Role::Assistant, text)])
        .await
    {
        // Logged only; the caller already has their answer
        warn!(%chat_id, error = %e, "Failed to save assistant message");
    }
}
