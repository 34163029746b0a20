use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

/// Health check: round-trips to the store so "ok" means the backend can
/// actually serve requests.
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    state.store.ping().await?;
    Ok(Json(json!({ "ok": true })))
}
