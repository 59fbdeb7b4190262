use crate::errors::ToolError;
use crate::gitlab::GitlabClient;
use crate::managers::args::{parse_args, ItemFilterArgs};
use crate::managers::listing;
use crate::services::logger::Logger;
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const TODO_TOOLS: &[&str] = &["get_todos"];

#[derive(Clone)]
pub struct TodosManager {
    logger: Logger,
    client: Arc<GitlabClient>,
}

impl TodosManager {
    pub fn new(logger: Logger, client: Arc<GitlabClient>) -> Self {
        Self {
            logger: logger.child("todos"),
            client,
        }
    }

    pub async fn get_todos(&self, args: ItemFilterArgs) -> Result<Value, ToolError> {
        let request = args.to_todos_request();
        self.logger
            .debug("get_todos", Some(&serde_json::json!({"path": request.path})));
        let response = self.client.get(&request).await?;
        Ok(listing(response.body.clone(), &response))
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for TodosManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            "get_todos" => self.get_todos(parse_args(tool, args)?).await,
            _ => Err(unknown_tool_error("todos", tool, TODO_TOOLS)),
        }
    }
}
