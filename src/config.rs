use crate::constants::network::{API_SUFFIX, TIMEOUT_API_REQUEST_MS};
use crate::constants::protocols::ALLOWED_HTTP;
use crate::errors::ConfigError;
use clap::Parser;
use std::ffi::OsString;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Command line surface. Every flag falls back to its environment variable.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gitlab-mcp",
    version,
    about = "Read-only GitLab tools over the Model Context Protocol (stdio)"
)]
pub struct Cli {
    /// GitLab instance URL, e.g. https://gitlab.example.com
    #[arg(long, env = "GITLAB_HOST")]
    pub host: Option<String>,

    /// Personal or project access token
    #[arg(long, env = "GITLAB_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Upper bound for a single GitLab request
    #[arg(long = "timeout-ms", env = "GITLAB_TIMEOUT_MS", default_value_t = TIMEOUT_API_REQUEST_MS)]
    pub timeout_ms: u64,
}

#[derive(Clone)]
pub struct Config {
    api_base: Url,
    token: String,
    timeout: Duration,
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|err| ConfigError::Arguments(err.to_string()))?;
        Self::from_cli(cli)
    }

    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        Self::resolve(cli.host.as_deref(), cli.token.as_deref(), cli.timeout_ms)
    }

    /// Validates raw settings. The token is checked first so a missing
    /// credential is always the reported failure.
    pub fn resolve(
        host: Option<&str>,
        token: Option<&str>,
        timeout_ms: u64,
    ) -> Result<Self, ConfigError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?
            .to_string();
        let host = host
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingHost)?;
        Ok(Self {
            api_base: resolve_api_base(host)?,
            token,
            timeout: Duration::from_millis(timeout_ms.max(1)),
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_base", &self.api_base.as_str())
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn resolve_api_base(host: &str) -> Result<Url, ConfigError> {
    let trimmed = host.trim_end_matches('/');
    let base = if trimmed.ends_with(API_SUFFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, API_SUFFIX)
    };
    let url = Url::parse(&base).map_err(|err| ConfigError::InvalidHost(err.to_string()))?;
    if !ALLOWED_HTTP.contains(&url.scheme()) {
        return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
    }
    Ok(url)
}
