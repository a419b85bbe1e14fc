//! MCP transport: newline-delimited JSON-RPC 2.0 over stdio.
//!
//! Methods:
//! - initialize / notifications/initialized / ping
//! - tools/list
//! - tools/call

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use time_engine::{Clock, ZoneDatabase};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::meeting::MeetingClient;
use crate::tools::{datetime, meeting, status, ToolOutput, TOOLS};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "util-server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    /// `None` only when the member is absent; `"id": null` is `Some(Null)`.
    #[serde(default, deserialize_with = "present")]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct McpResponse {
    jsonrpc: String,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
pub struct McpError {
    code: i32,
    message: String,
}

impl McpError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }
}

impl McpResponse {
    fn new(id: Value, result: std::result::Result<Value, McpError>) -> Self {
        let (result, error) = match result {
            Ok(r) => (Some(r), None),
            Err(e) => (None, Some(e)),
        };
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result,
            error,
        }
    }
}

/// Everything a tool call may need. Holds no per-request state.
pub struct Server {
    clock: Box<dyn Clock>,
    zones: Box<dyn ZoneDatabase>,
    meetings: MeetingClient,
}

impl Server {
    pub fn new(clock: Box<dyn Clock>, zones: Box<dyn ZoneDatabase>, meetings: MeetingClient) -> Self {
        Self {
            clock,
            zones,
            meetings,
        }
    }

    /// Handle one request. Notifications (no `id`) yield `None`.
    pub async fn handle(&self, request: &McpRequest) -> Option<McpResponse> {
        let result = match request.method.as_str() {
            "initialize" => handle_initialize(&request.params),
            "initialized" | "notifications/initialized" | "ping" => Ok(json!({})),
            "tools/list" => Ok(handle_tools_list()),
            "tools/call" => self.handle_tool_call(&request.params).await,
            _ => Err(McpError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            )),
        };

        match &request.id {
            Some(id) => Some(McpResponse::new(id.clone(), result)),
            None => {
                debug!(method = %request.method, "notification processed");
                None
            }
        }
    }

    async fn handle_tool_call(&self, params: &Option<Value>) -> std::result::Result<Value, McpError> {
        let params = params
            .as_ref()
            .ok_or_else(|| McpError::invalid_params("Missing params"))?;
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;
        let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        info!(tool = name, "tool call");
        let output = match name {
            "get_current_datetime" => datetime::get_current_datetime(
                self.clock.as_ref(),
                self.zones.as_ref(),
                &string_arg(&args, "timezone_name", datetime::DEFAULT_TIMEZONE)?,
                &string_arg(&args, "format_type", datetime::DEFAULT_FORMAT)?,
            ),
            "calculate_time_difference" => datetime::calculate_time_difference(
                self.clock.as_ref(),
                self.zones.as_ref(),
                &required_string_arg(&args, "start_datetime")?,
                &string_arg(&args, "end_datetime", "")?,
                &string_arg(&args, "timezone_name", datetime::DEFAULT_TIMEZONE)?,
            ),
            "download_meeting_data" => {
                meeting::download_meeting_data(
                    &self.meetings,
                    &required_string_arg(&args, "meeting_id")?,
                    bool_arg(&args, "include_transcript", true)?,
                    bool_arg(&args, "include_summary", true)?,
                )
                .await
            }
            "util_server_status" => {
                ToolOutput::success(status::util_server_status(self.meetings.config()), None)
            }
            _ => return Err(McpError::invalid_params(format!("Unknown tool: {name}"))),
        };

        if output.is_error {
            warn!(tool = name, "tool returned an error result");
        }
        Ok(output.into_result())
    }
}

/// Read requests line by line from `reader` and write responses to `writer`
/// until EOF.
pub async fn serve<R, W>(server: &Server, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("failed to read request")?;
        if read == 0 {
            break;
        }

        // Raw bytes: invalid UTF-8 is a parse error for that line only.
        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }
        debug!(bytes = line.len(), "received");

        let response = match serde_json::from_slice::<McpRequest>(line) {
            Ok(request) => {
                debug!(method = %request.method, "processing");
                server.handle(&request).await
            }
            Err(e) => {
                warn!(error = %e, "unparseable request");
                Some(McpResponse::new(
                    Value::Null,
                    Err(McpError::new(PARSE_ERROR, format!("Parse error: {e}"))),
                ))
            }
        };

        if let Some(response) = response {
            let mut json = serde_json::to_string(&response).context("failed to encode response")?;
            json.push('\n');
            writer
                .write_all(json.as_bytes())
                .await
                .context("failed to write response")?;
            writer.flush().await.context("failed to flush response")?;
        }
    }

    info!("client disconnected (EOF)");
    Ok(())
}

fn handle_initialize(params: &Option<Value>) -> std::result::Result<Value, McpError> {
    let client_name = params
        .as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("unknown");

    let protocol = params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_name, protocol, "client connected");

    Ok(json!({
        "protocolVersion": protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        }
    }))
}

fn handle_tools_list() -> Value {
    let schemas = [
        json!({
            "type": "object",
            "properties": {
                "timezone_name": {
                    "type": "string",
                    "description": "IANA timezone name (e.g. 'America/New_York', 'Europe/London') or 'UTC'",
                    "default": datetime::DEFAULT_TIMEZONE
                },
                "format_type": {
                    "type": "string",
                    "description": "Output format: iso, readable, timestamp or custom",
                    "default": datetime::DEFAULT_FORMAT
                }
            }
        }),
        json!({
            "type": "object",
            "properties": {
                "start_datetime": {
                    "type": "string",
                    "description": "Start time as 'YYYY-MM-DD HH:MM:SS' or ISO 8601 'YYYY-MM-DDTHH:MM:SS' (optionally with Z or an offset)"
                },
                "end_datetime": {
                    "type": "string",
                    "description": "End time in the same formats; empty means now",
                    "default": ""
                },
                "timezone_name": {
                    "type": "string",
                    "description": "Timezone for interpreting and displaying times",
                    "default": datetime::DEFAULT_TIMEZONE
                }
            },
            "required": ["start_datetime"]
        }),
        json!({
            "type": "object",
            "properties": {
                "meeting_id": {
                    "type": "string",
                    "description": "Read.AI meeting ID"
                },
                "include_transcript": {
                    "type": "boolean",
                    "description": "Whether to download the full transcript",
                    "default": true
                },
                "include_summary": {
                    "type": "boolean",
                    "description": "Whether to download the meeting summary",
                    "default": true
                }
            },
            "required": ["meeting_id"]
        }),
        json!({
            "type": "object",
            "properties": {}
        }),
    ];

    let tools: Vec<Value> = TOOLS
        .iter()
        .zip(schemas)
        .map(|((name, description), schema)| {
            json!({
                "name": name,
                "description": description,
                "inputSchema": schema
            })
        })
        .collect();

    json!({ "tools": tools })
}

// ── Argument helpers ────────────────────────────────────────────────────────

fn string_arg(args: &Value, name: &str, default: &str) -> std::result::Result<String, McpError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(McpError::invalid_params(format!("Argument '{name}' must be a string"))),
    }
}

fn required_string_arg(args: &Value, name: &str) -> std::result::Result<String, McpError> {
    match args.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        None | Some(Value::Null) => {
            Err(McpError::invalid_params(format!("Missing {name} argument")))
        }
        Some(_) => Err(McpError::invalid_params(format!("Argument '{name}' must be a string"))),
    }
}

fn bool_arg(args: &Value, name: &str, default: bool) -> std::result::Result<bool, McpError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(McpError::invalid_params(format!("Argument '{name}' must be a boolean"))),
    }
}
