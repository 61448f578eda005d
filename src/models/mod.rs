pub mod appointment;
pub mod log_entry;
pub mod tool_call;

pub use appointment::{AppointmentRecord, TimeInterval};
pub use log_entry::LogEntry;
pub use tool_call::{ToolCall, ToolCallEnvelope, ToolResult, ToolResults};
