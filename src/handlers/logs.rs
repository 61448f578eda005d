use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::log_outcome;
use crate::services::request_log::RequestMeta;
use crate::state::AppState;

// POST /logs
pub async fn log_event(
    State(state): State<Arc<AppState>>,
    meta: RequestMeta,
    Json(payload): Json<serde_json::Value>,
) -> StatusCode {
    log_outcome(&state, &meta, &payload, StatusCode::OK, "").await;
    StatusCode::OK
}
