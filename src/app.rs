use crate::config::Config;
use crate::errors::ToolError;
use crate::gitlab::GitlabClient;
use crate::managers::issues::{IssuesManager, ISSUE_TOOLS};
use crate::managers::projects::{ProjectsManager, PROJECT_TOOLS};
use crate::managers::search::{SearchManager, SEARCH_TOOLS};
use crate::managers::todos::{TodosManager, TODO_TOOLS};
use crate::managers::wiki::{WikiManager, WIKI_TOOLS};
use crate::mcp::catalog::tool_catalog;
use crate::services::logger::Logger;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub client: Arc<GitlabClient>,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    fn register(
        handlers: &mut HashMap<String, Arc<dyn ToolHandler>>,
        tools: &[&str],
        handler: Arc<dyn ToolHandler>,
    ) {
        for tool in tools {
            handlers.insert((*tool).to_string(), handler.clone());
        }
    }

    fn validate_tool_wiring(handlers: &HashMap<String, Arc<dyn ToolHandler>>) -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(ToolError::unexpected(format!(
            "Tool wiring is incomplete, no handler for: {}",
            missing.join(", ")
        )))
    }

    pub fn initialize(config: &Config) -> Result<Self, ToolError> {
        Self::with_logger(config, Logger::new("gitlab"))
    }

    pub fn with_logger(config: &Config, logger: Logger) -> Result<Self, ToolError> {
        let client = Arc::new(GitlabClient::new(config, logger.clone())?);

        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        Self::register(
            &mut handlers,
            PROJECT_TOOLS,
            Arc::new(ProjectsManager::new(logger.clone(), client.clone())),
        );
        Self::register(
            &mut handlers,
            ISSUE_TOOLS,
            Arc::new(IssuesManager::new(logger.clone(), client.clone())),
        );
        Self::register(
            &mut handlers,
            SEARCH_TOOLS,
            Arc::new(SearchManager::new(logger.clone(), client.clone())),
        );
        Self::register(
            &mut handlers,
            TODO_TOOLS,
            Arc::new(TodosManager::new(logger.clone(), client.clone())),
        );
        Self::register(
            &mut handlers,
            WIKI_TOOLS,
            Arc::new(WikiManager::new(logger.clone(), client.clone())),
        );
        Self::validate_tool_wiring(&handlers)?;

        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));
        logger.info(
            "initialized",
            Some(&serde_json::json!({
                "api_base": client.api_base().as_str(),
                "tools": tool_executor.tool_names(),
            })),
        );

        Ok(Self {
            logger,
            client,
            tool_executor,
        })
    }
}
