use clap::Parser;
use gitlab_mcp::config::{Cli, Config};

#[tokio::main]
async fn main() {
    let config = match Config::from_cli(Cli::parse()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("gitlab-mcp: {}", err);
            std::process::exit(1);
        }
    };
    if let Err(err) = gitlab_mcp::mcp::server::run_stdio(&config).await {
        eprintln!("gitlab-mcp: {}", err);
        std::process::exit(1);
    }
}
