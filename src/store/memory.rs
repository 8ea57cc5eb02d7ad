//! In-memory chat store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::{Chat, ChatStore, StoreError, StoreResult, StoredMessage};

/// HashMap-backed store for tests and runs without a database
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    chats: HashMap<Uuid, Chat>,
    // Messages kept per chat in insertion order
    messages: HashMap<Uuid, Vec<StoredMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning only happens if a holder panicked; propagating the
        // inner state is still sound for a plain data map.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn get_chat(&self, id: Uuid) -> StoreResult<Option<Chat>> {
        Ok(self.lock().chats.get(&id).cloned())
    }

    async fn create_chat(&self, chat: Chat) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.messages.entry(chat.id).or_default();
        inner.chats.insert(chat.id, chat);
        Ok(())
    }

    async fn save_messages(&self, messages: Vec<StoredMessage>) -> StoreResult<()> {
        let mut inner = self.lock();
        for message in messages {
            inner
                .messages
                .entry(message.chat_id)
                .or_default()
                .push(message);
        }
        Ok(())
    }

    async fn get_messages(&self, chat_id: Uuid) -> StoreResult<Vec<StoredMessage>> {
        Ok(self
            .lock()
            .messages
            .get(&chat_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_chat(&self, id: Uuid) -> StoreResult<()> {
        let mut inner = self.lock();
        if inner.chats.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        inner.messages.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    #[tokio::test]
    async fn test_create_and_get_chat() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let chat = Chat::new(id, "user-1", "Greetings");

        store.create_chat(chat.clone()).await.unwrap();
        let found = store.get_chat(id).await.unwrap();
        assert_eq!(found, Some(chat));

        let missing = store.get_chat(Uuid::new_v4()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_messages_keep_insertion_order() {
        let store = MemoryStore::new();
        let chat_id = Uuid::new_v4();
        store
            .create_chat(Chat::new(chat_id, "user-1", "Order test"))
            .await
            .unwrap();

        store
            .save_messages(vec![StoredMessage::new(chat_id, Role::User, "hello")])
            .await
            .unwrap();
        store
            .save_messages(vec![StoredMessage::new(chat_id, Role::Assistant, "hi!")])
            .await
            .unwrap();

        let messages = store.get_messages(chat_id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "hello");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "hi!");
    }

    #[tokio::test]
    async fn test_delete_removes_chat_and_messages() {
        let store = MemoryStore::new();
        let chat_id = Uuid::new_v4();
        store
            .create_chat(Chat::new(chat_id, "user-1", "Doomed"))
            .await
            .unwrap();
        store
            .save_messages(vec![StoredMessage::new(chat_id, Role::User, "bye")])
            .await
            .unwrap();

        store.delete_chat(chat_id).await.unwrap();
        assert!(store.get_chat(chat_id).await.unwrap().is_none());
        assert!(store.get_messages(chat_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_not_idempotent_success() {
        let store = MemoryStore::new();
        let chat_id = Uuid::new_v4();
        store
            .create_chat(Chat::new(chat_id, "user-1", "Once"))
            .await
            .unwrap();

        store.delete_chat(chat_id).await.unwrap();
        let second = store.delete_chat(chat_id).await;
        assert!(matches!(second, Err(StoreError::NotFound(id)) if id == chat_id));
    }

    #[tokio::test]
    async fn test_delete_unknown_chat() {
        let store = MemoryStore::new();
        let result = store.delete_chat(Uuid::new_v4()).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
