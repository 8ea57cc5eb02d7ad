//! Chat persistence layer
//!
//! Conversations and their messages, keyed by chat id and owner. Two
//! implementations: a Postgres-backed store for production and an in-memory
//! store for tests and credential-less runs. Ownership checks are the
//! handlers' job; the store only persists and retrieves.

pub mod error;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llm::Role;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::{PostgresStore, StoreConfig};

/// A titled, user-owned conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    pub fn new(id: Uuid, user_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            title: title.into(),
            created_at: Utc::now(),
        }
    }
}

/// A persisted message within a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl StoredMessage {
    pub fn new(chat_id: Uuid, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat_id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Interface all chat store implementations must satisfy
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Look up a chat by id
    async fn get_chat(&self, id: Uuid) -> StoreResult<Option<Chat>>;

    /// Create a new chat record
    async fn create_chat(&self, chat: Chat) -> StoreResult<()>;

    /// Append messages to their chats
    async fn save_messages(&self, messages: Vec<StoredMessage>) -> StoreResult<()>;

    /// All messages of a chat in insertion order
    async fn get_messages(&self, chat_id: Uuid) -> StoreResult<Vec<StoredMessage>>;

    /// Delete a chat and its messages
    ///
    /// Returns `StoreError::NotFound` when the chat does not exist, so a
    /// repeated delete can never report success twice.
    async fn delete_chat(&self, id: Uuid) -> StoreResult<()>;
}
