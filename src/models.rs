//! Request and response types for the relay API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm::{ChatMessage, Role};
use crate::store::{Chat, StoredMessage};

/// A chat message as the browser sends it
///
/// The role is loose on purpose: older clients say "bot" where the API says
/// "assistant".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: String,
}

impl ApiMessage {
    /// Map to the upstream message type; unknown roles become user input
    pub fn to_chat_message(&self) -> ChatMessage {
        let role = match self.role.as_str() {
            "assistant" | "bot" => Role::Assistant,
            "system" => Role::System,
            _ => Role::User,
        };
        ChatMessage {
            role,
            content: self.content.clone(),
        }
    }
}

/// Body of `POST /api/chat`
///
/// Either a single `message` or a full `messages` history must be present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Conversation id; a fresh one is generated when absent
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Single-message form
    #[serde(default)]
    pub message: Option<String>,
    /// Full-history form
    #[serde(default)]
    pub messages: Option<Vec<ApiMessage>>,
    /// Client-facing model selector (e.g. "chat-model-reasoning")
    #[serde(default)]
    pub selected_chat_model: Option<String>,
    /// Stream tokens as SSE instead of returning one JSON body
    #[serde(default)]
    pub stream: bool,
}

impl SendMessageRequest {
    /// Conversation history to forward upstream, oldest first
    pub fn history(&self) -> Vec<ChatMessage> {
        if let Some(messages) = &self.messages {
            messages.iter().map(ApiMessage::to_chat_message).collect()
        } else if let Some(message) = &self.message {
            vec![ChatMessage::user(message.clone())]
        } else {
            Vec::new()
        }
    }

    /// Content of the most recent user message, if any
    ///
    /// A submission without one is a 400.
    pub fn most_recent_user_message(&self) -> Option<String> {
        if let Some(messages) = &self.messages {
            messages
                .iter()
                .rev()
                .find(|m| m.role == "user")
                .map(|m| m.content.clone())
        } else {
            self.message.clone().filter(|m| !m.is_empty())
        }
    }
}

/// Body of a non-streaming `POST /api/chat` success
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: Uuid,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Body of `GET /api/chat?id=<uuid>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryResponse {
    pub chat: Chat,
    pub messages: Vec<StoredMessage>,
}

/// Generic error body; never carries upstream details or credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
