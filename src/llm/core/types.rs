//! Core types for the LLM provider abstraction

use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions prepended to the conversation
    System,
    /// Human input
    User,
    /// Model output
    Assistant,
}

/// A single message in the conversation sent upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

/// Request to generate a completion from an inference backend
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Conversation history, oldest first
    pub messages: Vec<ChatMessage>,
    /// Backend-specific model identifier
    pub model: String,
    /// System prompt, prepended if the backend has no dedicated field
    pub system: Option<String>,
    /// Token generation cap, backend default when absent
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: model.into(),
            system: None,
            max_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Last user message in the history, if any
    pub fn most_recent_user_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.role == Role::User)
    }
}

/// A finished completion from an inference backend
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Final answer text
    pub text: String,
    /// Reasoning ("thinking") text emitted before the answer, if any
    pub reasoning: Option<String>,
}

impl Completion {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reasoning: None,
        }
    }
}

/// Incremental events emitted while streaming a completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenChunk {
    /// Answer token(s)
    Text { text: String },
    /// Reasoning token(s), tagged separately from the answer
    Reasoning { text: String },
    /// Generation finished
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = ChatMessage::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");

        let msg = ChatMessage::assistant("Hi there");
        assert_eq!(msg.role, Role::Assistant);

        let msg = ChatMessage::system("Be brief");
        assert_eq!(msg.role, Role::System);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), "\"system\"");
    }

    #[test]
    fn test_message_serialization() {
        let msg = ChatMessage::user("What is 2+2?");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"What is 2+2?\""));

        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new("gpt-4o-mini", vec![ChatMessage::user("hi")])
            .with_system("Be helpful")
            .with_max_tokens(512);
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.system.as_deref(), Some("Be helpful"));
        assert_eq!(request.max_tokens, Some(512));
    }

    #[test]
    fn test_most_recent_user_message() {
        let request = CompletionRequest::new(
            "gpt-4o-mini",
            vec![
                ChatMessage::user("first"),
                ChatMessage::assistant("answer"),
                ChatMessage::user("second"),
            ],
        );
        assert_eq!(
            request.most_recent_user_message().map(|m| m.content.as_str()),
            Some("second")
        );

        let empty = CompletionRequest::new("gpt-4o-mini", vec![]);
        assert!(empty.most_recent_user_message().is_none());
    }

    #[test]
    fn test_token_chunk_serialization() {
        let chunk = TokenChunk::Text {
            text: "Hello".to_string(),
        };
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(json.contains("\"type\":\"text\""));

        let chunk = TokenChunk::Reasoning {
            text: "Let me think".to_string(),
        };
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(json.contains("\"type\":\"reasoning\""));

        let json = serde_json::to_string(&TokenChunk::Done).unwrap();
        assert!(json.contains("\"type\":\"done\""));
    }
}
