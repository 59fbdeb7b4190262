use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::ToolError;
use crate::services::logger::Logger;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Runs `tool` with already schema-checked `args`.
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError>;
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: HashMap<String, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(handlers),
        }
    }

    pub fn has_tool(&self, tool: &str) -> bool {
        self.handlers.contains_key(tool)
    }

    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn execute(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        let Some(handler) = self.handlers.get(tool) else {
            return Err(ToolError::unexpected(format!("No handler registered for {}", tool)));
        };
        let started = Instant::now();
        let result = handler.handle(tool, args).await;
        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => self.logger.debug(
                "tool call finished",
                Some(&serde_json::json!({"tool": tool, "duration_ms": duration_ms})),
            ),
            Err(err) => self.logger.debug(
                "tool call failed",
                Some(&serde_json::json!({
                    "tool": tool,
                    "duration_ms": duration_ms,
                    "kind": err.kind,
                    "status": err.status,
                })),
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::logger::LogLevel;

    struct Echo;

    #[async_trait]
    impl ToolHandler for Echo {
        async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
            Ok(serde_json::json!({"tool": tool, "args": args}))
        }
    }

    fn executor() -> ToolExecutor {
        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        handlers.insert("echo".to_string(), Arc::new(Echo));
        ToolExecutor::new(Logger::with_level("test", LogLevel::Error), handlers)
    }

    #[tokio::test]
    async fn dispatches_by_tool_name() {
        let result = executor()
            .execute("echo", serde_json::json!({"a": 1}))
            .await
            .expect("echo result");
        assert_eq!(result["tool"], "echo");
        assert_eq!(result["args"]["a"], 1);
    }

    #[tokio::test]
    async fn missing_handler_is_unexpected() {
        let err = executor()
            .execute("nope", Value::Null)
            .await
            .expect_err("no handler");
        assert!(!err.is_invalid_params());
        assert!(err.message.contains("nope"));
    }
}
