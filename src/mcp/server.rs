use crate::app::App;
use crate::config::Config;
use crate::errors::{ErrorCode, McpError, ToolError};
use crate::mcp::catalog::{tool_by_name, tool_catalog, tool_names, validate_tool_args};
use crate::mcp::envelope::{normalize_error, ToolResult};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::services::logger::Logger;
use crate::utils::tool_errors::unknown_tool_message;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

const PROTOCOL_VERSION: &str = "2025-06-18";
const SERVER_NAME: &str = "gitlab-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct McpServer {
    app: Arc<App>,
    logger: Logger,
}

impl McpServer {
    pub fn new(app: App) -> Self {
        let logger = app.logger.child("server");
        Self {
            app: Arc::new(app),
            logger,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ToolError> {
        Ok(Self::new(App::initialize(config)?))
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": tool_catalog() })
    }

    /// Malformed calls (unknown tool, bad arguments) come back as `Err`;
    /// everything that reached GitLab, successful or not, is an `Ok` envelope.
    pub async fn handle_tools_call(&self, name: &str, raw_args: Value) -> Result<ToolResult, McpError> {
        if tool_by_name(name).is_none() || !self.app.tool_executor.has_tool(name) {
            return Err(McpError::method_not_found(unknown_tool_message(
                name,
                &tool_names(),
            )));
        }

        let args = if raw_args.is_null() {
            Value::Object(Default::default())
        } else {
            raw_args
        };
        validate_tool_args(name, &args)?;

        self.logger
            .debug("tools/call", Some(&serde_json::json!({ "tool": name })));

        match self.app.tool_executor.execute(name, args).await {
            Ok(payload) => Ok(ToolResult::success(&payload)),
            Err(err) if err.is_invalid_params() => Err(McpError::invalid_params(err.message)),
            Err(err) => Ok(normalize_error(name, &err, &self.logger)),
        }
    }

    /// Handles one line of input. Returns `None` when nothing should be
    /// written back (notifications, blank lines).
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let parsed: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(err) => {
                self.logger.warn(
                    "discarding unparsable message",
                    Some(&serde_json::json!({ "error": err.to_string() })),
                );
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    ErrorCode::ParseError.as_i32(),
                    "Parse error",
                ));
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(parsed) {
            Ok(req) => req,
            Err(_) => {
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    ErrorCode::InvalidRequest.as_i32(),
                    "Invalid request",
                ))
            }
        };

        if request.is_notification() {
            if !request.method.starts_with("notifications/") {
                self.logger.debug(
                    "ignoring request without id",
                    Some(&serde_json::json!({ "method": request.method })),
                );
            }
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.handle_initialize()),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(id, self.handle_tools_list()),
            "tools/call" => {
                let params = request.params.as_object().cloned().unwrap_or_default();
                let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
                if name.is_empty() {
                    JsonRpcResponse::failure(id, ErrorCode::InvalidParams.as_i32(), "Missing tool name")
                } else {
                    let args = params.get("arguments").cloned().unwrap_or(Value::Null);
                    match self.handle_tools_call(name, args).await {
                        Ok(result) => JsonRpcResponse::success(id, result.to_value()),
                        Err(err) => JsonRpcResponse::from_error(id, err),
                    }
                }
            }
            _ if request.method.starts_with("notifications/") => {
                JsonRpcResponse::success(id, serde_json::json!({}))
            }
            _ => JsonRpcResponse::failure(
                id,
                ErrorCode::MethodNotFound.as_i32(),
                "Method not found",
            ),
        };
        Some(response)
    }

    /// Serves newline-delimited JSON-RPC until the reader hits EOF or
    /// `shutdown` resolves, whichever comes first.
    pub async fn serve<R, W, S>(&self, reader: R, writer: W, shutdown: S) -> Result<(), ToolError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        let mut lines = BufReader::new(reader).lines();
        let mut writer = BufWriter::new(writer);
        tokio::pin!(shutdown);

        loop {
            let next = tokio::select! {
                _ = &mut shutdown => {
                    self.logger.info("interrupt received, closing connection", None);
                    break;
                }
                next = lines.next_line() => next?,
            };
            let Some(line) = next else {
                self.logger.info("input closed", None);
                break;
            };
            if let Some(response) = self.handle_line(&line).await {
                let payload = serde_json::to_string(&response)
                    .map_err(|err| ToolError::unexpected(err.to_string()))?;
                writer.write_all(payload.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        writer.flush().await?;
        self.logger.debug("log counters", Some(&self.logger.stats()));
        Ok(())
    }

    pub async fn run_stdio(&self) -> Result<(), ToolError> {
        self.serve(tokio::io::stdin(), tokio::io::stdout(), interrupt())
            .await
    }
}

async fn interrupt() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

pub async fn run_stdio(config: &Config) -> Result<(), ToolError> {
    let server = McpServer::from_config(config)?;
    server.run_stdio().await
}
