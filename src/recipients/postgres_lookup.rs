//! PostgreSQL-backed entity lookup.
//!
//! Reads the `name` column of a row identified by an integer `id` column.

use async_trait::async_trait;
use sqlx::postgres::PgPool;

use super::lookup::{EntityLookup, LookupEntity, LookupError};

pub struct PostgresEntityLookup {
    pool: PgPool,
    table: String,
    query: String,
}

impl PostgresEntityLookup {
    /// Create a lookup over `table`. The table name is interpolated into SQL, so
    /// only `[A-Za-z0-9_]` names are accepted.
    pub fn new(pool: PgPool, table: &str) -> Result<Self, LookupError> {
        if !is_table_name(table) {
            return Err(LookupError::InvalidConfig(format!(
                "invalid table name: {:?}",
                table
            )));
        }

        Ok(Self {
            pool,
            table: table.to_string(),
            query: format!("SELECT name FROM {} WHERE id = $1", table),
        })
    }
}

fn is_table_name(table: &str) -> bool {
    !table.is_empty()
        && !table.starts_with(|c: char| c.is_ascii_digit())
        && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[async_trait]
impl EntityLookup for PostgresEntityLookup {
    async fn lookup(&self, id: &str) -> Result<Option<LookupEntity>, LookupError> {
        // Ids are integer keys; anything else cannot match a row
        let Ok(id) = id.parse::<i64>() else {
            return Ok(None);
        };

        let name = sqlx::query_scalar::<_, String>(&self.query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        tracing::debug!(table = %self.table, id = id, found = name.is_some(), "Entity lookup");

        Ok(name.map(|name| LookupEntity { name }))
    }
}
