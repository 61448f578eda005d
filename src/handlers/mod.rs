pub mod appointments;
pub mod health;
pub mod logs;

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::async_trait;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::errors::AppError;
use crate::models::{ToolCall, ToolCallEnvelope};
use crate::services::request_log::{LogError, RequestMeta};
use crate::state::AppState;

#[async_trait]
impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let client_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("Unknown")
            .to_string();

        Ok(RequestMeta {
            client_ip,
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            user_agent,
        })
    }
}

/// First tool call in the payload whose function name matches.
pub(crate) fn find_tool_call(
    payload: &serde_json::Value,
    function_name: &'static str,
) -> Result<ToolCall, AppError> {
    let envelope = ToolCallEnvelope::from_payload(payload)
        .map_err(|e| AppError::InvalidPayload(e.to_string()))?;
    envelope
        .find_call(function_name)
        .cloned()
        .ok_or(AppError::MissingToolCall(function_name))
}

/// Writes the request's log row. A failed log write never changes the response.
pub(crate) async fn log_outcome(
    state: &AppState,
    meta: &RequestMeta,
    payload: &serde_json::Value,
    status: StatusCode,
    note: &str,
) {
    match state
        .request_log
        .log_request(meta, payload, status.as_u16(), note)
        .await
    {
        Ok(_) => {}
        Err(LogError::MissingCallId) => {
            tracing::warn!(path = %meta.path, "payload has no message.call.id, request not logged");
        }
        Err(e) => {
            tracing::error!(error = %e, path = %meta.path, "failed to write request log");
        }
    }
}

/// Logs a rejected payload and renders the error.
pub(crate) async fn reject(
    state: &AppState,
    meta: &RequestMeta,
    payload: &serde_json::Value,
    err: AppError,
) -> Response {
    tracing::warn!(error = %err, path = %meta.path, "rejecting tool call payload");
    log_outcome(state, meta, payload, err.status(), &err.to_string()).await;
    err.into_response()
}
