//! Recipient token resolution.
//!
//! Turns the recipient tokens stored on a bulk message into labels for display.
//! Resolution is total: every token yields exactly one label, in input order,
//! and anything that cannot be resolved becomes `(unknown)`.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use crate::message::MessageRegistry;
use crate::metrics::RecipientMetrics;

use super::lookup::EntityLookup;

/// Label for tokens that cannot be resolved
pub const UNKNOWN_RECIPIENT: &str = "(unknown)";

/// Separates the prefix from the entity id in a parameterized token
pub const TOKEN_SEPARATOR: &str = "::";

/// A recipient token split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientToken<'a> {
    /// e.g. `all`, `incomplete`
    Simple(&'a str),
    /// e.g. `school::567`
    Query { prefix: &'a str, id: &'a str },
}

impl<'a> RecipientToken<'a> {
    pub fn parse(token: &'a str) -> Self {
        match token.split_once(TOKEN_SEPARATOR) {
            Some((prefix, id)) if !prefix.is_empty() && !id.is_empty() => {
                RecipientToken::Query { prefix, id }
            }
            _ => RecipientToken::Simple(token),
        }
    }
}

pub struct RecipientResolver {
    registry: Arc<MessageRegistry>,
    lookups: HashMap<String, Arc<dyn EntityLookup>>,
}

impl RecipientResolver {
    pub fn new(registry: Arc<MessageRegistry>) -> Self {
        Self {
            registry,
            lookups: HashMap::new(),
        }
    }

    /// Register the entity lookup used for `<prefix>::<id>` tokens
    pub fn with_lookup(mut self, prefix: impl Into<String>, lookup: Arc<dyn EntityLookup>) -> Self {
        self.lookups.insert(prefix.into(), lookup);
        self
    }

    pub fn has_lookup(&self, prefix: &str) -> bool {
        self.lookups.contains_key(prefix)
    }

    /// Resolve tokens to labels, one per token, preserving order and duplicates.
    pub async fn resolve(&self, tokens: &[String]) -> Vec<String> {
        join_all(tokens.iter().map(|token| self.resolve_token(token))).await
    }

    /// Resolve a single token. Never fails.
    pub async fn resolve_token(&self, token: &str) -> String {
        let label = match RecipientToken::parse(token) {
            RecipientToken::Simple(token) => self.registry.recipient_label(token).map(str::to_string),
            RecipientToken::Query { prefix, id } => self.resolve_query(prefix, id).await,
        };

        label.unwrap_or_else(|| {
            RecipientMetrics::record_unknown();
            UNKNOWN_RECIPIENT.to_string()
        })
    }

    async fn resolve_query(&self, prefix: &str, id: &str) -> Option<String> {
        let template = self.registry.query_label(prefix)?;
        let lookup = self.lookups.get(prefix)?;

        match lookup.lookup(id).await {
            Ok(Some(entity)) => {
                RecipientMetrics::record_lookup_found();
                Some(template.replace("{name}", &entity.name))
            }
            Ok(None) => {
                RecipientMetrics::record_lookup_missing();
                tracing::debug!(prefix = %prefix, id = %id, "Recipient entity not found");
                None
            }
            Err(e) => {
                RecipientMetrics::record_lookup_failed();
                tracing::warn!(
                    prefix = %prefix,
                    id = %id,
                    error = %e,
                    "Recipient lookup failed, treating as unknown"
                );
                None
            }
        }
    }
}
