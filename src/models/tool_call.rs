use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The `message` envelope the voice platform posts to every webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallEnvelope {
    pub message: EnvelopeMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeMessage {
    #[serde(rename = "toolCalls")]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ToolCallEnvelope {
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(payload.clone())
    }

    pub fn find_call(&self, function_name: &str) -> Option<&ToolCall> {
        self.message
            .tool_calls
            .iter()
            .find(|call| call.function.name == function_name)
    }
}

impl FunctionCall {
    /// Arguments arrive either as an object or as a JSON-encoded string.
    pub fn parse_arguments<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match &self.arguments {
            serde_json::Value::String(raw) => serde_json::from_str(raw),
            other => serde_json::from_value(other.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckAppointmentArgs {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MakeAppointmentArgs {
    pub email: String,
    pub name: String,
    pub date: String,
    pub intent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResults {
    pub results: Vec<ToolResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    #[serde(rename = "toolCallId")]
    pub tool_call_id: String,
    pub result: String,
}

impl ToolResults {
    pub fn single(tool_call_id: &str, result: &str) -> Self {
        Self {
            results: vec![ToolResult {
                tool_call_id: tool_call_id.to_string(),
                result: result.to_string(),
            }],
        }
    }
}
