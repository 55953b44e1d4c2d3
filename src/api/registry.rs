//! Known-value endpoints used by the admin editor.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct TriggerInfo {
    pub id: String,
    pub description: String,
}

/// GET /api/v1/triggers - Known triggers
pub async fn list_triggers(State(state): State<AppState>) -> Json<Vec<TriggerInfo>> {
    let triggers = state
        .service
        .registry()
        .triggers()
        .map(|(id, description)| TriggerInfo {
            id: id.to_string(),
            description: description.to_string(),
        })
        .collect();

    Json(triggers)
}

/// GET /api/v1/template-styles - Known template styles
pub async fn list_template_styles(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .service
            .registry()
            .template_styles()
            .map(str::to_string)
            .collect(),
    )
}
