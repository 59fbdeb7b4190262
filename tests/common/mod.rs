#![allow(dead_code)]

use gitlab_mcp::app::App;
use gitlab_mcp::config::Config;
use gitlab_mcp::mcp::envelope::ToolResult;
use gitlab_mcp::mcp::server::McpServer;
use gitlab_mcp::services::logger::{LogLevel, Logger};
use once_cell::sync::Lazy;
use serde_json::Value;
use tokio::sync::Mutex;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub const TEST_TOKEN: &str = "glpat-test-token";

pub fn quiet_logger() -> Logger {
    Logger::with_level("test", LogLevel::Error)
}

pub fn server_with_timeout(base_url: &str, timeout_ms: u64) -> McpServer {
    let config = Config::resolve(Some(base_url), Some(TEST_TOKEN), timeout_ms).expect("config");
    McpServer::new(App::with_logger(&config, quiet_logger()).expect("app"))
}

pub fn server_for(base_url: &str) -> McpServer {
    server_with_timeout(base_url, 5_000)
}

/// A GET mock on `target` (path plus raw query, exactly as sent) that only
/// matches requests carrying the test token.
pub fn get_mock(gitlab: &mut mockito::ServerGuard, target: &str) -> mockito::Mock {
    gitlab
        .mock("GET", target)
        .match_header("private-token", TEST_TOKEN)
        .with_header("content-type", "application/json")
}

/// Parses the text block of a successful tool result.
pub fn payload(result: &ToolResult) -> Value {
    assert!(!result.is_error, "unexpected failure: {}", result.text());
    serde_json::from_str(result.text()).expect("tool output is JSON")
}
