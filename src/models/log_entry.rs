use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const LOG_HEADERS: [&str; 9] = [
    "Timestamp",
    "IP Address",
    "Method",
    "Path",
    "Status Code",
    "User-Agent",
    "Call Id",
    "Additional Msg",
    "Data",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub client_ip: String,
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub user_agent: String,
    pub call_id: String,
    pub message: String,
    pub raw_payload: String,
}

impl LogEntry {
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.client_ip.clone(),
            self.method.clone(),
            self.path.clone(),
            self.status_code.to_string(),
            self.user_agent.clone(),
            self.call_id.clone(),
            self.message.clone(),
            self.raw_payload.clone(),
        ]
    }
}

/// Compact JSON for the `Data` column, or `No data` for an empty payload.
pub fn render_payload(payload: &serde_json::Value) -> String {
    let empty = match payload {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        "No data".to_string()
    } else {
        payload.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_payload() {
        assert_eq!(render_payload(&json!(null)), "No data");
        assert_eq!(render_payload(&json!({})), "No data");
        assert_eq!(render_payload(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_row_matches_headers() {
        let entry = LogEntry {
            timestamp: NaiveDateTime::parse_from_str("2024-06-01 10:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            client_ip: "127.0.0.1".to_string(),
            method: "POST".to_string(),
            path: "/logs".to_string(),
            status_code: 200,
            user_agent: "Unknown".to_string(),
            call_id: "call-1".to_string(),
            message: String::new(),
            raw_payload: "No data".to_string(),
        };
        let row = entry.to_row();
        assert_eq!(row.len(), LOG_HEADERS.len());
        assert_eq!(row[0], "2024-06-01 10:00:00");
        assert_eq!(row[4], "200");
        assert_eq!(row[6], "call-1");
    }
}
