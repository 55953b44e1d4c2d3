use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::health::health;
use super::messages::{
    create_message, delete_message, get_message, list_messages, preview_message, queue_message,
    record_stage, update_message,
};
use super::metrics::prometheus_metrics;
use super::registry::{list_template_styles, list_triggers};
use super::templates::validate_template;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .nest(
            "/api/v1",
            Router::new()
                // Messages
                .route("/messages", get(list_messages).post(create_message))
                .route(
                    "/messages/{id}",
                    get(get_message).patch(update_message).delete(delete_message),
                )
                .route("/messages/{id}/queue", post(queue_message))
                .route("/messages/{id}/stages", post(record_stage))
                .route("/messages/{id}/preview", post(preview_message))
                // Known values
                .route("/triggers", get(list_triggers))
                .route("/template-styles", get(list_template_styles))
                // Template syntax
                .route("/templates/validate", post(validate_template)),
        )
}
