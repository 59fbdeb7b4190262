use crate::errors::ToolError;
use crate::gitlab::GitlabClient;
use crate::managers::args::{parse_args, WikiPageArgs, WikiPagesArgs};
use crate::managers::listing;
use crate::services::logger::Logger;
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const WIKI_TOOLS: &[&str] = &["get_wiki_page", "list_wiki_pages"];

#[derive(Clone)]
pub struct WikiManager {
    logger: Logger,
    client: Arc<GitlabClient>,
}

impl WikiManager {
    pub fn new(logger: Logger, client: Arc<GitlabClient>) -> Self {
        Self {
            logger: logger.child("wiki"),
            client,
        }
    }

    pub async fn get_wiki_page(&self, args: WikiPageArgs) -> Result<Value, ToolError> {
        let request = args.to_request();
        self.logger
            .debug("get_wiki_page", Some(&serde_json::json!({"path": request.path})));
        Ok(self.client.get(&request).await?.body)
    }

    pub async fn list_wiki_pages(&self, args: WikiPagesArgs) -> Result<Value, ToolError> {
        let request = args.to_request();
        self.logger
            .debug("list_wiki_pages", Some(&serde_json::json!({"path": request.path})));
        let response = self.client.get(&request).await?;
        Ok(listing(response.body.clone(), &response))
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for WikiManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            "get_wiki_page" => self.get_wiki_page(parse_args(tool, args)?).await,
            "list_wiki_pages" => self.list_wiki_pages(parse_args(tool, args)?).await,
            _ => Err(unknown_tool_error("wiki", tool, WIKI_TOOLS)),
        }
    }
}
