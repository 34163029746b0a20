use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use loom_persist::Thread;

use crate::{error::ApiResult, state::AppState};

const PLACEHOLDER_TITLE: &str = "New conversation";

#[derive(Debug, Deserialize)]
pub struct CreateThreadRequest {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct CreateThreadResponse {
    pub id: String,
}

/// Create a thread (with its welcome message).
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateThreadRequest>,
) -> ApiResult<(StatusCode, Json<CreateThreadResponse>)> {
    let title = req.title.trim();
    let title = if title.is_empty() {
        PLACEHOLDER_TITLE
    } else {
        title
    };

    let thread = state.store.create_thread(title).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateThreadResponse {
            id: thread.id.to_hex(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListThreadsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct ListThreadsResponse {
    pub page: u64,
    pub limit: i64,
    pub total_threads: u64,
    pub threads: Vec<ThreadSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub id: String,
    pub title: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub last_message_at: chrono::DateTime<chrono::Utc>,
    pub messages_count: i64,
    pub archived: bool,
    pub tags: Vec<String>,
}

/// List threads, most recently active first.
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListThreadsQuery>,
) -> ApiResult<Json<ListThreadsResponse>> {
    let limit = query.limit.clamp(1, 100);

    let page = state.store.list_threads(query.page, limit).await?;

    Ok(Json(ListThreadsResponse {
        page: page.page,
        limit: page.limit,
        total_threads: page.total,
        threads: page.threads.into_iter().map(thread_to_summary).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RenameThreadRequest {
    pub title: String,
}

/// Rename a thread.
pub async fn rename_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    Json(req): Json<RenameThreadRequest>,
) -> ApiResult<Json<Value>> {
    state
        .store
        .rename_thread(&thread_id, req.title.trim())
        .await?;
    Ok(Json(json!({ "ok": true })))
}

fn thread_to_summary(thread: Thread) -> ThreadSummary {
    ThreadSummary {
        id: thread.id.to_hex(),
        title: thread.title,
        updated_at: thread.updated_at,
        last_message_at: thread.last_message_at,
        messages_count: thread.messages_count,
        archived: thread.archived,
        tags: thread.tags,
    }
}
