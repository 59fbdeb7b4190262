use crate::errors::ToolError;
use crate::gitlab::shape::shape_projects;
use crate::gitlab::GitlabClient;
use crate::managers::args::{parse_args, ListProjectsArgs};
use crate::managers::listing;
use crate::services::logger::Logger;
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const PROJECT_TOOLS: &[&str] = &["list_projects"];

#[derive(Clone)]
pub struct ProjectsManager {
    logger: Logger,
    client: Arc<GitlabClient>,
}

impl ProjectsManager {
    pub fn new(logger: Logger, client: Arc<GitlabClient>) -> Self {
        Self {
            logger: logger.child("projects"),
            client,
        }
    }

    pub async fn list_projects(&self, args: ListProjectsArgs) -> Result<Value, ToolError> {
        let request = args.to_request();
        self.logger
            .debug("list_projects", Some(&serde_json::json!({"path": request.path})));
        let response = self.client.get(&request).await?;
        Ok(listing(shape_projects(&response.body), &response))
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for ProjectsManager {
    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            "list_projects" => self.list_projects(parse_args(tool, args)?).await,
            _ => Err(unknown_tool_error("projects", tool, PROJECT_TOOLS)),
        }
    }
}
