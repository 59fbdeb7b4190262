use serde::Serialize;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidParams,
    Unauthorized,
    Forbidden,
    NotFound,
    Remote,
    Unexpected,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, message)
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Unexpected, message)
    }

    /// Classifies a non-success HTTP status. `message` is whatever the remote
    /// body or the transport had to say about the failure.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            401 => ToolErrorKind::Unauthorized,
            403 => ToolErrorKind::Forbidden,
            404 => ToolErrorKind::NotFound,
            _ => ToolErrorKind::Remote,
        };
        Self::new(kind, message).with_status(status)
    }

    pub fn is_invalid_params(&self) -> bool {
        self.kind == ToolErrorKind::InvalidParams
    }

    /// True for failures that carry an HTTP status from the remote platform.
    pub fn is_http(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::Unauthorized
                | ToolErrorKind::Forbidden
                | ToolErrorKind::NotFound
                | ToolErrorKind::Remote
        )
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::unexpected(err.to_string())
    }
}
