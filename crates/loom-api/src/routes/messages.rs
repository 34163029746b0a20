use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use loom_chat::TurnOutcome;
use loom_persist::{MessageRole, StoredMessage, Usage};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
}

/// Post a user message and run one completion turn.
///
/// A completion failure after the user write still answers with an error
/// status; the persisted user message is visible via `list_messages`.
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    Json(req): Json<PostMessageRequest>,
) -> ApiResult<(StatusCode, Json<TurnOutcome>)> {
    let outcome = state.chat.post_message(&thread_id, &req.content).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    pub before_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// List a thread's messages, newest-first, cursored strictly before
/// `before_id` when given.
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    Query(query): Query<ListMessagesQuery>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    if state.store.get_thread(&thread_id).await?.is_none() {
        return Err(ApiError::ThreadNotFound(thread_id));
    }

    let limit = query.limit.clamp(1, 200);
    let messages = state
        .store
        .list_messages(&thread_id, query.before_id.as_deref(), limit)
        .await?;

    Ok(Json(
        messages.into_iter().map(message_to_response).collect(),
    ))
}

fn message_to_response(message: StoredMessage) -> MessageResponse {
    MessageResponse {
        id: message.id.to_hex(),
        role: message.role,
        content: message.content,
        created_at: message.created_at,
        model: message.model,
        usage: message.usage,
        latency_ms: message.latency_ms,
    }
}
