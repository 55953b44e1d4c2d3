//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub messages: usize,
    pub database: DatabaseHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealthResponse {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_connections: Option<usize>,
}

/// GET /health - Liveness and basic counts
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let messages = state.service.count().await;

    let database = match &state.postgres {
        Some(pg) => DatabaseHealthResponse {
            configured: true,
            pool_size: Some(pg.pool().size()),
            idle_connections: Some(pg.pool().num_idle()),
        },
        None => DatabaseHealthResponse {
            configured: false,
            pool_size: None,
            idle_connections: None,
        },
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        messages,
        database,
    })
}
