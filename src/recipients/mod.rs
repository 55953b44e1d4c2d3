//! Recipient token resolution.
//!
//! This module provides:
//! - `RecipientResolver`: turns recipient tokens into human-readable labels
//! - `EntityLookup`: capability used by `<prefix>::<id>` tokens
//! - In-memory and PostgreSQL lookup implementations

mod factory;
mod lookup;
mod postgres_lookup;
mod resolver;

pub use factory::create_recipient_resolver;
pub use lookup::{EntityLookup, InMemoryEntityLookup, LookupEntity, LookupError};
pub use postgres_lookup::PostgresEntityLookup;
pub use resolver::{RecipientResolver, RecipientToken, TOKEN_SEPARATOR, UNKNOWN_RECIPIENT};
