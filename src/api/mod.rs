//! API layer - HTTP endpoint handlers organized by domain.

mod health;
mod messages;
mod metrics;
mod registry;
mod routes;
mod templates;

// Re-export all handlers for use in server/app.rs
pub use health::{health, HealthResponse};
pub use messages::{
    create_message, delete_message, get_message, list_messages, preview_message, queue_message,
    record_stage, update_message, MessageListResponse, PreviewRequest, RecordStageRequest,
};
pub use metrics::prometheus_metrics;
pub use registry::{list_template_styles, list_triggers, TriggerInfo};
pub use routes::api_routes;
pub use templates::{validate_template, ValidateTemplateRequest, ValidateTemplateResponse};
