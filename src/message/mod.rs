//! Outbound messages.
//!
//! This module provides:
//! - The `Message` aggregate with trim-then-validate field rules
//! - Delivery lifecycle classification from timestamps
//! - The known-value registry (triggers, template styles, recipient labels)
//! - Message storage and the `MessageService` application service

mod kind;
mod lifecycle;
mod model;
mod registry;
mod service;
mod store;
mod validation;

pub use kind::{MessageKind, UnknownKind};
pub use lifecycle::{derive_status, DeliveryTimestamps, LifecycleStage, MessageStatus};
pub use model::{Message, MessageChanges, MessageDraft, DEFAULT_TEMPLATE_STYLE};
pub use registry::MessageRegistry;
pub use service::{MessageDetails, MessageError, MessageResult, MessageService, RenderedMessage};
pub use store::{MemoryMessageStore, MessageChange, MessageStore, Modified, StoreError};
pub use validation::{FieldError, ValidationErrors, BLANK, NOT_INCLUDED};
