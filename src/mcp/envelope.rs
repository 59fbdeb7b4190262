use crate::constants::messages::{
    FORBIDDEN, NOT_FOUND, REMOTE_PREFIX, UNAUTHORIZED, UNEXPECTED_PREFIX,
};
use crate::errors::{ToolError, ToolErrorKind};
use crate::services::logger::Logger;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text",
            text: text.into(),
        }
    }
}

/// The only shape a `tools/call` ever answers with. Remote and transport
/// failures travel here with `isError` set, never as JSON-RPC faults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResult {
    pub content: Vec<ContentBlock>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(payload: &Value) -> Self {
        let text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| "null".to_string());
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: false,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(message)],
            is_error: true,
        }
    }

    pub fn text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or("")
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Fixed caller-facing text for a failed GitLab call.
pub fn error_message(error: &ToolError) -> String {
    match error.kind {
        ToolErrorKind::Unauthorized => UNAUTHORIZED.to_string(),
        ToolErrorKind::Forbidden => FORBIDDEN.to_string(),
        ToolErrorKind::NotFound => NOT_FOUND.to_string(),
        ToolErrorKind::Remote => format!("{}: {}", REMOTE_PREFIX, error.message),
        ToolErrorKind::InvalidParams | ToolErrorKind::Unexpected => {
            format!("{}: {}", UNEXPECTED_PREFIX, error.message)
        }
    }
}

pub fn normalize_error(tool: &str, error: &ToolError, logger: &Logger) -> ToolResult {
    let meta = serde_json::json!({
        "tool": tool,
        "kind": error.kind,
        "status": error.status,
        "message": error.message,
    });
    if error.is_http() {
        logger.warn("GitLab request failed", Some(&meta));
    } else {
        logger.error("Unexpected failure during tool call", Some(&meta));
    }
    ToolResult::failure(error_message(error))
}
