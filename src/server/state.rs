use std::sync::Arc;
use std::time::Instant;

use crate::config::MessagesConfig;
use crate::message::{MemoryMessageStore, MessageRegistry, MessageService};
use crate::postgres::PostgresPool;
use crate::recipients::create_recipient_resolver;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MessageService>,
    pub postgres: Option<PostgresPool>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(messages: &MessagesConfig, postgres: Option<PostgresPool>) -> Self {
        let registry = Arc::new(MessageRegistry::from_config(messages));
        let resolver = Arc::new(create_recipient_resolver(
            messages,
            registry.clone(),
            postgres.as_ref(),
        ));
        let service = Arc::new(MessageService::new(
            Arc::new(MemoryMessageStore::new()),
            registry,
            resolver,
        ));

        Self::with_service(service, postgres)
    }

    /// Build state around an existing service (e.g., with custom lookups)
    pub fn with_service(service: Arc<MessageService>, postgres: Option<PostgresPool>) -> Self {
        Self {
            service,
            postgres,
            started_at: Instant::now(),
        }
    }
}
