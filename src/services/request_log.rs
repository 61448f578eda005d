use std::time::Duration;

use chrono::Utc;

use crate::models::log_entry::{render_payload, LOG_HEADERS};
use crate::models::LogEntry;
use crate::services::tables::{StoreError, Table};

/// Who called and how, captured from the inbound HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMeta {
    pub client_ip: String,
    pub method: String,
    pub path: String,
    pub user_agent: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("payload has no message.call.id")]
    MissingCallId,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The platform's call id, from `message.call.id`.
pub fn call_id(payload: &serde_json::Value) -> Option<String> {
    match payload.pointer("/message/call/id")? {
        serde_json::Value::String(id) => Some(id.clone()),
        serde_json::Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Appends one row per inbound request to the log sheet.
pub struct RequestLogger {
    table: Box<dyn Table>,
    timeout: Duration,
}

impl RequestLogger {
    pub fn new(table: Box<dyn Table>, timeout: Duration) -> Self {
        Self { table, timeout }
    }

    pub async fn log_request(
        &self,
        meta: &RequestMeta,
        payload: &serde_json::Value,
        status_code: u16,
        note: &str,
    ) -> Result<LogEntry, LogError> {
        tracing::info!(
            client_ip = %meta.client_ip,
            method = %meta.method,
            path = %meta.path,
            status_code,
            "\"{} {} {}\"",
            meta.method,
            meta.path,
            status_code
        );

        let call_id = call_id(payload).ok_or(LogError::MissingCallId)?;

        let entry = LogEntry {
            timestamp: Utc::now().naive_utc(),
            client_ip: meta.client_ip.clone(),
            method: meta.method.clone(),
            path: meta.path.clone(),
            status_code,
            user_agent: meta.user_agent.clone(),
            call_id,
            message: note.to_string(),
            raw_payload: render_payload(payload),
        };

        tokio::time::timeout(self.timeout, self.append_entry(&entry))
            .await
            .map_err(|_| StoreError::Timeout)??;

        Ok(entry)
    }

    async fn append_entry(&self, entry: &LogEntry) -> Result<(), StoreError> {
        if self.table.is_empty().await? {
            let header: Vec<String> = LOG_HEADERS.iter().map(|h| h.to_string()).collect();
            self.table.append_row(&header).await?;
        }
        self.table.append_row(&entry.to_row()).await
    }
}
