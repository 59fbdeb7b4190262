use crate::errors::ToolError;
use crate::gitlab::GitlabClient;
use crate::managers::args::{parse_args, SearchArgs};
use crate::managers::listing;
use crate::services::logger::Logger;
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const SEARCH_TOOLS: &[&str] = &["search"];

#[derive(Clone)]
pub struct SearchManager {
    logger: Logger,
    client: Arc<GitlabClient>,
}

impl SearchManager {
    pub fn new(logger: Logger, client: Arc<GitlabClient>) -> Self {
        Self {
            logger: logger.child("search"),
            client,
        }
    }

    /// Result objects differ per scope, so they are passed through as is.
    pub async fn search(&self, args: SearchArgs) -> Result<Value, ToolError> {
        let request = args.to_request();
        self.logger.debug(
            "search",
            Some(&serde_json::json!({"path": request.path, "scope": args.scope})),
        );
        let response = self.client.get(&request).await?;
        Ok(listing(response.body.clone(), &response))
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for SearchManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            "search" => self.search(parse_args(tool, args)?).await,
            _ => Err(unknown_tool_error("search", tool, SEARCH_TOOLS)),
        }
    }
}
