//! Message endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::message::{
    LifecycleStage, Message, MessageChanges, MessageDetails, MessageDraft, RenderedMessage,
};
use crate::server::AppState;
use crate::template::TemplateContext;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Only automated messages fired by this trigger
    pub trigger: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct RecordStageRequest {
    pub stage: LifecycleStage,
    /// Defaults to now
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub context: TemplateContext,
    #[serde(default)]
    pub use_examples: bool,
}

/// GET /api/v1/messages - List messages, optionally by trigger
#[tracing::instrument(name = "http.list_messages", skip(state))]
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<MessageListResponse>> {
    let messages = match query.trigger.as_deref() {
        Some(trigger) => state.service.for_trigger(trigger).await?,
        None => state.service.list().await?,
    };
    let total = messages.len();

    Ok(Json(MessageListResponse { messages, total }))
}

/// POST /api/v1/messages - Create a new message
#[tracing::instrument(
    name = "http.create_message",
    skip(state, draft),
    fields(name = %draft.name)
)]
pub async fn create_message(
    State(state): State<AppState>,
    Json(draft): Json<MessageDraft>,
) -> Result<(StatusCode, Json<Message>)> {
    let message = state.service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/v1/messages/{id} - Get a message with its status and recipients
#[tracing::instrument(name = "http.get_message", skip(state))]
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageDetails>> {
    Ok(Json(state.service.details(id).await?))
}

/// PATCH /api/v1/messages/{id} - Update a drafted message
#[tracing::instrument(name = "http.update_message", skip(state, changes))]
pub async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<MessageChanges>,
) -> Result<Json<Message>> {
    Ok(Json(state.service.update(id, changes).await?))
}

/// DELETE /api/v1/messages/{id} - Delete a drafted message
#[tracing::instrument(name = "http.delete_message", skip(state))]
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/messages/{id}/queue - Queue a bulk message for delivery
#[tracing::instrument(name = "http.queue_message", skip(state))]
pub async fn queue_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>> {
    Ok(Json(state.service.queue_delivery(id, Utc::now()).await?))
}

/// POST /api/v1/messages/{id}/stages - Record a lifecycle timestamp
#[tracing::instrument(
    name = "http.record_stage",
    skip(state, request),
    fields(stage = request.stage.as_str())
)]
pub async fn record_stage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordStageRequest>,
) -> Result<Json<Message>> {
    let at = request.at.unwrap_or_else(Utc::now);
    Ok(Json(state.service.record_stage(id, request.stage, at).await?))
}

/// POST /api/v1/messages/{id}/preview - Render subject and body
#[tracing::instrument(
    name = "http.preview_message",
    skip(state, request),
    fields(use_examples = request.use_examples)
)]
pub async fn preview_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<RenderedMessage>> {
    let rendered = state
        .service
        .preview(id, &request.context, request.use_examples)
        .await?;
    Ok(Json(rendered))
}
