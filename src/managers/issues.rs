use crate::errors::ToolError;
use crate::gitlab::shape::{shape_issues, shape_notes};
use crate::gitlab::GitlabClient;
use crate::managers::args::{parse_args, IssueArgs, IssueNotesArgs, ItemFilterArgs};
use crate::managers::listing;
use crate::services::logger::Logger;
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const ISSUE_TOOLS: &[&str] = &["get_issues", "get_issue", "get_issue_notes"];

#[derive(Clone)]
pub struct IssuesManager {
    logger: Logger,
    client: Arc<GitlabClient>,
}

impl IssuesManager {
    pub fn new(logger: Logger, client: Arc<GitlabClient>) -> Self {
        Self {
            logger: logger.child("issues"),
            client,
        }
    }

    pub async fn get_issues(&self, args: ItemFilterArgs) -> Result<Value, ToolError> {
        let request = args.to_issues_request();
        self.logger
            .debug("get_issues", Some(&serde_json::json!({"path": request.path})));
        let response = self.client.get(&request).await?;
        Ok(listing(shape_issues(&response.body), &response))
    }

    /// Single issues are returned in full; only listings are trimmed.
    pub async fn get_issue(&self, args: IssueArgs) -> Result<Value, ToolError> {
        let request = args.to_request();
        self.logger
            .debug("get_issue", Some(&serde_json::json!({"path": request.path})));
        Ok(self.client.get(&request).await?.body)
    }

    pub async fn get_issue_notes(&self, args: IssueNotesArgs) -> Result<Value, ToolError> {
        let request = args.to_request();
        self.logger
            .debug("get_issue_notes", Some(&serde_json::json!({"path": request.path})));
        let response = self.client.get(&request).await?;
        Ok(listing(shape_notes(&response.body), &response))
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for IssuesManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            "get_issues" => self.get_issues(parse_args(tool, args)?).await,
            "get_issue" => self.get_issue(parse_args(tool, args)?).await,
            "get_issue_notes" => self.get_issue_notes(parse_args(tool, args)?).await,
            _ => Err(unknown_tool_error("issues", tool, ISSUE_TOOLS)),
        }
    }
}
