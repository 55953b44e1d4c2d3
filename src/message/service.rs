//! Message application service.
//!
//! Composes the registry, store, template engine and recipient resolver into the
//! operations the admin API and the dispatcher use.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::metrics::{LifecycleMetrics, MessageMetrics};
use crate::recipients::RecipientResolver;
use crate::template::TemplateContext;

use super::lifecycle::{LifecycleStage, MessageStatus};
use super::model::{Message, MessageChanges, MessageDraft};
use super::registry::MessageRegistry;
use super::store::{MessageStore, Modified, StoreError};
use super::validation::ValidationErrors;

/// Message service error type
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Message not found: {0}")]
    NotFound(Uuid),

    #[error("Message {0} has been queued and can no longer be edited")]
    NotEditable(Uuid),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for MessageError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => MessageError::NotFound(id),
            other => MessageError::Store(other),
        }
    }
}

/// Result type for message operations
pub type MessageResult<T> = Result<T, MessageError>;

/// Rendered subject and body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    pub subject: String,
    pub body: String,
}

/// A message together with its derived state
#[derive(Debug, Clone, Serialize)]
pub struct MessageDetails {
    #[serde(flatten)]
    pub message: Message,
    pub status: MessageStatus,
    pub can_edit: bool,
    pub recipients_list: Vec<String>,
}

pub struct MessageService {
    store: Arc<dyn MessageStore>,
    registry: Arc<MessageRegistry>,
    resolver: Arc<RecipientResolver>,
}

fn record_validation_failures(errors: &ValidationErrors) {
    for error in errors.iter() {
        MessageMetrics::record_validation_failure(&error.field);
    }
}

impl MessageService {
    pub fn new(
        store: Arc<dyn MessageStore>,
        registry: Arc<MessageRegistry>,
        resolver: Arc<RecipientResolver>,
    ) -> Self {
        Self {
            store,
            registry,
            resolver,
        }
    }

    pub fn registry(&self) -> &Arc<MessageRegistry> {
        &self.registry
    }

    pub fn resolver(&self) -> &Arc<RecipientResolver> {
        &self.resolver
    }

    /// Validate and store a new message
    pub async fn create(&self, draft: MessageDraft) -> MessageResult<Message> {
        let message = Message::from_draft(draft, &self.registry, Utc::now()).map_err(|e| {
            record_validation_failures(&e);
            e
        })?;

        let message = self.store.insert(message).await?;
        MessageMetrics::record_created(message.kind.as_str());
        MessageMetrics::set_stored(self.store.count().await);

        tracing::info!(
            message_id = %message.id,
            kind = %message.kind,
            trigger = ?message.trigger,
            "Message created"
        );

        Ok(message)
    }

    pub async fn get(&self, id: Uuid) -> MessageResult<Message> {
        self.store.get(id).await?.ok_or(MessageError::NotFound(id))
    }

    /// Message with status, editability and resolved recipients
    pub async fn details(&self, id: Uuid) -> MessageResult<MessageDetails> {
        let message = self.get(id).await?;
        let recipients_list = message.recipients_list(&self.resolver).await;

        Ok(MessageDetails {
            status: message.status(),
            can_edit: message.can_edit(),
            recipients_list,
            message,
        })
    }

    /// Number of stored messages
    pub async fn count(&self) -> usize {
        self.store.count().await
    }

    /// All messages, oldest first
    pub async fn list(&self) -> MessageResult<Vec<Message>> {
        Ok(self.store.list().await?)
    }

    /// Automated messages fired by `trigger`.
    ///
    /// Fails with `InvalidArgument` when `trigger` is not a known trigger; a known
    /// trigger without messages yields an empty list.
    pub async fn for_trigger(&self, trigger: &str) -> MessageResult<Vec<Message>> {
        if !self.registry.is_known_trigger(trigger) {
            return Err(MessageError::InvalidArgument(format!(
                "Unknown trigger: {}",
                trigger
            )));
        }

        Ok(self.store.find_automated_by_trigger(trigger).await?)
    }

    /// Apply content changes to a drafted message. The editability check and
    /// the write happen atomically in the store.
    pub async fn update(&self, id: Uuid, changes: MessageChanges) -> MessageResult<Message> {
        let registry = &self.registry;
        let now = Utc::now();

        let modified = self
            .store
            .modify(
                id,
                Box::new(move |message: &mut Message| -> Result<bool, MessageError> {
                    if !message.can_edit() {
                        return Err(MessageError::NotEditable(id));
                    }
                    message.apply_changes(changes, registry, now)?;
                    Ok(true)
                }),
            )
            .await
            .map_err(|e| {
                if let MessageError::Validation(errors) = &e {
                    record_validation_failures(errors);
                }
                e
            })?;

        MessageMetrics::record_updated();
        tracing::info!(message_id = %id, "Message updated");

        Ok(modified.message)
    }

    /// Delete a drafted message
    pub async fn delete(&self, id: Uuid) -> MessageResult<()> {
        if !self.store.delete_if(id, &|message: &Message| message.can_edit()).await? {
            return Err(MessageError::NotEditable(id));
        }

        MessageMetrics::record_deleted();
        MessageMetrics::set_stored(self.store.count().await);
        tracing::info!(message_id = %id, "Message deleted");

        Ok(())
    }

    /// Record a lifecycle timestamp. A stage that is already recorded keeps its
    /// first value.
    pub async fn record_stage(
        &self,
        id: Uuid,
        stage: LifecycleStage,
        at: DateTime<Utc>,
    ) -> MessageResult<Message> {
        let modified = self
            .store
            .modify(
                id,
                Box::new(move |message: &mut Message| -> Result<bool, MessageError> {
                    Ok(message.delivery.record(stage, at))
                }),
            )
            .await?;

        self.log_stage(id, stage, &modified);
        Ok(modified.message)
    }

    /// Queue a bulk message for delivery. Automated messages are sent by their
    /// trigger and cannot be queued by hand.
    pub async fn queue_delivery(&self, id: Uuid, at: DateTime<Utc>) -> MessageResult<Message> {
        let modified = self
            .store
            .modify(
                id,
                Box::new(move |message: &mut Message| -> Result<bool, MessageError> {
                    if message.is_automated() {
                        return Err(MessageError::InvalidArgument(
                            "Automated messages are delivered by their trigger".to_string(),
                        ));
                    }
                    if !message.can_edit() {
                        return Err(MessageError::NotEditable(id));
                    }
                    Ok(message.delivery.record(LifecycleStage::Queued, at))
                }),
            )
            .await?;

        self.log_stage(id, LifecycleStage::Queued, &modified);
        Ok(modified.message)
    }

    fn log_stage(&self, id: Uuid, stage: LifecycleStage, modified: &Modified) {
        if !modified.changed {
            tracing::debug!(
                message_id = %id,
                stage = stage.as_str(),
                "Lifecycle stage already recorded"
            );
            return;
        }

        LifecycleMetrics::record_stage(stage.as_str());
        tracing::info!(
            message_id = %id,
            stage = stage.as_str(),
            status = %modified.message.status(),
            "Lifecycle stage recorded"
        );
    }

    /// Render subject and body against `context` or the example values
    pub async fn preview(
        &self,
        id: Uuid,
        context: &TemplateContext,
        use_examples: bool,
    ) -> MessageResult<RenderedMessage> {
        let message = self.get(id).await?;
        let engine = self.registry.template_engine();

        Ok(RenderedMessage {
            subject: message.parsed_subject(engine, context, use_examples),
            body: message.parsed_body(engine, context, use_examples),
        })
    }

    /// Labels for the message's recipient tokens
    pub async fn recipients_list(&self, id: Uuid) -> MessageResult<Vec<String>> {
        let message = self.get(id).await?;
        Ok(message.recipients_list(&self.resolver).await)
    }
}
