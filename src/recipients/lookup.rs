//! Entity lookup capability for parameterized recipient tokens

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while looking up an entity.
#[derive(Debug, Error)]
pub enum LookupError {
    /// PostgreSQL operation failed
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// Lookup could not be configured (e.g., invalid table name)
    #[error("Invalid lookup configuration: {0}")]
    InvalidConfig(String),

    /// Backend is temporarily unavailable
    #[error("Lookup unavailable: {0}")]
    Unavailable(String),
}

/// An entity referenced by a recipient token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntity {
    pub name: String,
}

/// Fetches the display name of an entity by id.
///
/// Implementations may block on I/O or fail; the resolver treats both a missing
/// entity and an error as "not found".
#[async_trait]
pub trait EntityLookup: Send + Sync {
    async fn lookup(&self, id: &str) -> Result<Option<LookupEntity>, LookupError>;
}

/// In-memory entity lookup keyed by id
#[derive(Debug, Default)]
pub struct InMemoryEntityLookup {
    entities: DashMap<String, LookupEntity>,
}

impl InMemoryEntityLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entity
    pub fn insert(&self, id: impl Into<String>, name: impl Into<String>) {
        self.entities
            .insert(id.into(), LookupEntity { name: name.into() });
    }
}

#[async_trait]
impl EntityLookup for InMemoryEntityLookup {
    async fn lookup(&self, id: &str) -> Result<Option<LookupEntity>, LookupError> {
        Ok(self.entities.get(id).map(|e| e.value().clone()))
    }
}
