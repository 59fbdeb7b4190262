use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GITLAB_API_TOKEN is required")]
    MissingToken,
    #[error("GITLAB_HOST is required")]
    MissingHost,
    #[error("GITLAB_HOST is not a valid URL: {0}")]
    InvalidHost(String),
    #[error("GITLAB_HOST must use http or https, got '{0}'")]
    UnsupportedScheme(String),
    #[error("{0}")]
    Arguments(String),
}
