//! The callable tools and their shared result type.

pub mod datetime;
pub mod meeting;
pub mod status;

use serde_json::{json, Value};

/// Name and one-line description of every tool the server exposes.
pub const TOOLS: &[(&str, &str)] = &[
    (
        "get_current_datetime",
        "Get the current date and time in any timezone and format",
    ),
    (
        "calculate_time_difference",
        "Calculate the time difference between two datetimes",
    ),
    (
        "download_meeting_data",
        "Download Read.AI meeting transcripts and summaries",
    ),
    (
        "util_server_status",
        "Check utility server status and configuration",
    ),
];

/// What a tool hands back to the transport.
///
/// Failures are ordinary outputs with `is_error` set; nothing a tool does
/// turns into a protocol error.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
    /// Labeled fields for callers that should not parse `text`.
    pub structured: Option<Value>,
}

impl ToolOutput {
    pub fn success(text: String, structured: Option<Value>) -> Self {
        Self {
            text,
            is_error: false,
            structured,
        }
    }

    pub fn failure(text: String) -> Self {
        Self {
            text,
            is_error: true,
            structured: None,
        }
    }

    /// The MCP `tools/call` result object.
    pub fn into_result(self) -> Value {
        let mut result = json!({
            "content": [{ "type": "text", "text": self.text }],
            "isError": self.is_error,
        });
        if let Some(structured) = self.structured {
            result["structuredContent"] = structured;
        }
        result
    }
}
