//! Recipient resolver factory

use std::sync::Arc;

use crate::config::MessagesConfig;
use crate::message::MessageRegistry;
use crate::postgres::PostgresPool;

use super::lookup::{EntityLookup, InMemoryEntityLookup};
use super::postgres_lookup::PostgresEntityLookup;
use super::resolver::RecipientResolver;

/// Create a recipient resolver with one lookup per configured query prefix.
///
/// Each `query_recipients` entry gets:
/// - A `PostgresEntityLookup` on its table if a PostgreSQL pool is provided
/// - An empty `InMemoryEntityLookup` otherwise (its tokens resolve as unknown)
///
/// # Example
///
/// ```rust,ignore
/// let resolver = create_recipient_resolver(&settings.messages, registry.clone(), pg_pool.as_ref());
/// ```
pub fn create_recipient_resolver(
    config: &MessagesConfig,
    registry: Arc<MessageRegistry>,
    postgres_pool: Option<&PostgresPool>,
) -> RecipientResolver {
    let mut resolver = RecipientResolver::new(registry);

    for query in &config.query_recipients {
        let lookup: Arc<dyn EntityLookup> = match postgres_pool {
            Some(pool) => match PostgresEntityLookup::new(pool.pool().clone(), &query.table) {
                Ok(lookup) => {
                    tracing::info!(
                        backend = "postgres",
                        prefix = %query.prefix,
                        table = %query.table,
                        "Creating PostgreSQL recipient lookup"
                    );
                    Arc::new(lookup)
                }
                Err(e) => {
                    tracing::warn!(
                        prefix = %query.prefix,
                        error = %e,
                        "Invalid recipient lookup, falling back to memory"
                    );
                    Arc::new(InMemoryEntityLookup::new())
                }
            },
            None => {
                tracing::info!(
                    backend = "memory",
                    prefix = %query.prefix,
                    "Creating memory recipient lookup"
                );
                Arc::new(InMemoryEntityLookup::new())
            }
        };

        resolver = resolver.with_lookup(query.prefix.clone(), lookup);
    }

    resolver
}
