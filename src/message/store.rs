//! Message storage.
//!
//! This module defines the abstraction layer for message persistence, plus an
//! in-memory implementation. The store performs no validation; callers go
//! through `MessageService`.

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use super::model::Message;
use super::service::MessageError;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Message not found: {0}")]
    NotFound(Uuid),

    #[error("Message already exists: {0}")]
    AlreadyExists(Uuid),

    /// Backend is temporarily unavailable
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Backend trait for message storage.
///
/// Implementations must be thread-safe (`Send + Sync`) as they are shared
/// across request handlers.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Store a new message.
    async fn insert(&self, message: Message) -> Result<Message, StoreError>;

    /// Fetch a message by id.
    async fn get(&self, id: Uuid) -> Result<Option<Message>, StoreError>;

    /// Apply `change` to a stored message atomically. No other change to the
    /// same message can interleave between the read and the write.
    ///
    /// The change reports whether it modified the message; a rejected change
    /// must leave the message untouched.
    async fn modify(&self, id: Uuid, change: MessageChange<'_>) -> Result<Modified, MessageError>;

    /// Remove a message if `removable` allows it. Returns `false` when the
    /// predicate rejected the removal.
    async fn delete_if(
        &self,
        id: Uuid,
        removable: &(dyn for<'m> Fn(&'m Message) -> bool + Send + Sync),
    ) -> Result<bool, StoreError>;

    /// All messages, oldest first.
    async fn list(&self) -> Result<Vec<Message>, StoreError>;

    /// Automated messages whose trigger equals `trigger` exactly, oldest first.
    async fn find_automated_by_trigger(&self, trigger: &str) -> Result<Vec<Message>, StoreError>;

    /// Number of stored messages.
    async fn count(&self) -> usize;
}

/// An in-place change to a stored message. Returns whether anything changed.
pub type MessageChange<'a> = Box<dyn FnOnce(&mut Message) -> Result<bool, MessageError> + Send + 'a>;

/// Result of `MessageStore::modify`
#[derive(Debug, Clone)]
pub struct Modified {
    pub message: Message,
    pub changed: bool,
}

fn sort_by_creation(messages: &mut [Message]) {
    messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

/// In-memory message store.
///
/// Uses `DashMap` for concurrent access. Messages are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    messages: DashMap<Uuid, Message>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn insert(&self, message: Message) -> Result<Message, StoreError> {
        if self.messages.contains_key(&message.id) {
            return Err(StoreError::AlreadyExists(message.id));
        }

        tracing::debug!(message_id = %message.id, "Message stored");
        self.messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Message>, StoreError> {
        Ok(self.messages.get(&id).map(|m| m.value().clone()))
    }

    async fn modify(&self, id: Uuid, change: MessageChange<'_>) -> Result<Modified, MessageError> {
        // The entry guard holds the shard lock for the whole read-change-write
        let mut entry = self
            .messages
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        let changed = change(entry.value_mut())?;
        if changed {
            tracing::debug!(message_id = %id, "Message updated");
        }

        Ok(Modified {
            message: entry.value().clone(),
            changed,
        })
    }

    async fn delete_if(
        &self,
        id: Uuid,
        removable: &(dyn for<'m> Fn(&'m Message) -> bool + Send + Sync),
    ) -> Result<bool, StoreError> {
        if self.messages.remove_if(&id, |_, message| removable(message)).is_some() {
            tracing::debug!(message_id = %id, "Message removed");
            return Ok(true);
        }

        if self.messages.contains_key(&id) {
            Ok(false)
        } else {
            Err(StoreError::NotFound(id))
        }
    }

    async fn list(&self) -> Result<Vec<Message>, StoreError> {
        let mut messages: Vec<Message> = self
            .messages
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        sort_by_creation(&mut messages);
        Ok(messages)
    }

    async fn find_automated_by_trigger(&self, trigger: &str) -> Result<Vec<Message>, StoreError> {
        let mut messages: Vec<Message> = self
            .messages
            .iter()
            .filter(|entry| {
                let message = entry.value();
                message.is_automated() && message.trigger.as_deref() == Some(trigger)
            })
            .map(|entry| entry.value().clone())
            .collect();
        sort_by_creation(&mut messages);
        Ok(messages)
    }

    async fn count(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageKind, DeliveryTimestamps};
    use chrono::{Duration, Utc};

    fn message(kind: MessageKind, trigger: Option<&str>, age_minutes: i64) -> Message {
        let at = Utc::now() - Duration::minutes(age_minutes);
        Message {
            id: Uuid::new_v4(),
            kind,
            template_style: "default".to_string(),
            name: "Test".to_string(),
            subject: "Subject".to_string(),
            body: "Body".to_string(),
            trigger: trigger.map(str::to_string),
            recipients: Vec::new(),
            delivery: DeliveryTimestamps::default(),
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryMessageStore::new();
        let msg = message(MessageKind::Bulk, None, 0);
        let id = msg.id;

        store.insert(msg.clone()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Some(msg.clone()));
        assert!(matches!(
            store.insert(msg).await,
            Err(StoreError::AlreadyExists(_))
        ));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_modify_in_place() {
        let store = MemoryMessageStore::new();
        let msg = message(MessageKind::Bulk, None, 0);
        store.insert(msg.clone()).await.unwrap();

        let modified = store
            .modify(
                msg.id,
                Box::new(|m: &mut Message| -> Result<bool, MessageError> {
                    m.name = "Renamed".to_string();
                    Ok(true)
                }),
            )
            .await
            .unwrap();
        assert!(modified.changed);
        assert_eq!(modified.message.name, "Renamed");
        assert_eq!(store.get(msg.id).await.unwrap().unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn test_modify_rejected_leaves_message() {
        let store = MemoryMessageStore::new();
        let msg = message(MessageKind::Bulk, None, 0);
        store.insert(msg.clone()).await.unwrap();

        let err = store
            .modify(
                msg.id,
                Box::new(|m: &mut Message| -> Result<bool, MessageError> {
                    Err(MessageError::NotEditable(m.id))
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, MessageError::NotEditable(_)));
        assert_eq!(store.get(msg.id).await.unwrap(), Some(msg));

        let missing = store
            .modify(
                Uuid::new_v4(),
                Box::new(|_: &mut Message| -> Result<bool, MessageError> { Ok(true) }),
            )
            .await
            .unwrap_err();
        assert!(matches!(missing, MessageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_modify_serializes_concurrent_changes() {
        let store = std::sync::Arc::new(MemoryMessageStore::new());
        let msg = message(MessageKind::Bulk, None, 0);
        store.insert(msg.clone()).await.unwrap();

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .modify(
                            msg.id,
                            Box::new(|m: &mut Message| -> Result<bool, MessageError> {
                                m.recipients.push("all".to_string());
                                Ok(true)
                            }),
                        )
                        .await
                        .unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.get(msg.id).await.unwrap().unwrap().recipients.len(), 16);
    }

    #[tokio::test]
    async fn test_delete_if() {
        let store = MemoryMessageStore::new();
        let mut queued = message(MessageKind::Bulk, None, 0);
        queued.delivery.queued_at = Some(Utc::now());
        let drafted = message(MessageKind::Bulk, None, 0);
        store.insert(queued.clone()).await.unwrap();
        store.insert(drafted.clone()).await.unwrap();

        let editable = |m: &Message| m.can_edit();
        assert!(!store.delete_if(queued.id, &editable).await.unwrap());
        assert!(store.delete_if(drafted.id, &editable).await.unwrap());

        assert!(store.get(queued.id).await.unwrap().is_some());
        assert!(store.get(drafted.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_if(drafted.id, &editable).await,
            Err(StoreError::NotFound(_))
        ));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_list_oldest_first() {
        let store = MemoryMessageStore::new();
        let newer = message(MessageKind::Bulk, None, 1);
        let older = message(MessageKind::Bulk, None, 10);
        store.insert(newer.clone()).await.unwrap();
        store.insert(older.clone()).await.unwrap();

        let ids: Vec<Uuid> = store.list().await.unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![older.id, newer.id]);
    }

    #[tokio::test]
    async fn test_find_automated_by_trigger() {
        let store = MemoryMessageStore::new();
        let first = message(MessageKind::Automated, Some("questionnaire.pending"), 5);
        let second = message(MessageKind::Automated, Some("questionnaire.pending"), 1);
        store.insert(second.clone()).await.unwrap();
        store.insert(first.clone()).await.unwrap();
        store
            .insert(message(MessageKind::Automated, Some("questionnaire.accepted"), 0))
            .await
            .unwrap();
        // Bulk messages never match, even with a trigger set
        store
            .insert(message(MessageKind::Bulk, Some("questionnaire.pending"), 0))
            .await
            .unwrap();

        let pending = store
            .find_automated_by_trigger("questionnaire.pending")
            .await
            .unwrap();
        let ids: Vec<Uuid> = pending.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);

        assert!(store
            .find_automated_by_trigger("questionnaire.denied")
            .await
            .unwrap()
            .is_empty());
    }
}
