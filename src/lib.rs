// Infrastructure (shared components)
pub mod config;
pub mod error;
pub mod metrics;
pub mod postgres;

// Domain layer (business logic)
pub mod message;
pub mod recipients;
pub mod template;

// Application layer
pub mod api;
pub mod server;
