//! PostgreSQL persistence module.
//!
//! Provides connection pooling for database-backed recipient lookups.

pub mod pool;

pub use pool::{PostgresPool, PostgresPoolError};
