use crate::config::Config;
use crate::constants::network::TOKEN_HEADER;
use crate::errors::ToolError;
use crate::gitlab::request::ApiRequest;
use crate::services::logger::Logger;
use crate::utils::text::truncate_utf8_prefix;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Instant;
use url::Url;

const MAX_ERROR_TEXT_BYTES: usize = 512;

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub headers: HeaderMap,
    pub body: Value,
}

/// Shared handle to the REST API. Built once at startup; the base URL, token
/// header and timeout never change afterwards.
#[derive(Clone)]
pub struct GitlabClient {
    logger: Logger,
    http: Client,
    api_base: Url,
}

impl GitlabClient {
    pub fn new(config: &Config, logger: Logger) -> Result<Self, ToolError> {
        let mut token = HeaderValue::from_str(config.token()).map_err(|_| {
            ToolError::unexpected("Access token contains characters not allowed in a header")
        })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ToolError::unexpected(format!("Failed to build HTTP client: {}", err)))?;

        Ok(Self {
            logger: logger.child("client"),
            http,
            api_base: config.api_base().clone(),
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, ToolError> {
        let base = self.api_base.as_str().trim_end_matches('/');
        let raw = format!("{}{}", base, request.target()?);
        Url::parse(&raw).map_err(|err| ToolError::unexpected(format!("Invalid request URL: {}", err)))
    }

    pub async fn get(&self, request: &ApiRequest) -> Result<ApiResponse, ToolError> {
        let url = self.url_for(request)?;
        let started = Instant::now();
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(map_reqwest_error)?;

        self.logger.debug(
            "GET",
            Some(&serde_json::json!({
                "path": request.path,
                "status": status.as_u16(),
                "duration_ms": started.elapsed().as_millis() as u64,
            })),
        );

        if !status.is_success() {
            let message = remote_error_message(status, &text);
            return Err(ToolError::from_status(status.as_u16(), message));
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|err| {
                ToolError::unexpected(format!("Response from {} is not valid JSON: {}", request.path, err))
            })?
        };

        Ok(ApiResponse {
            headers,
            body,
        })
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ToolError {
    if err.is_timeout() {
        return ToolError::unexpected("request to GitLab timed out");
    }
    ToolError::unexpected(err.to_string())
}

/// Best description of a failed response: the API's own `message` or
/// `error`, then the raw body, then the status line.
fn remote_error_message(status: StatusCode, text: &str) -> String {
    if let Ok(body) = serde_json::from_str::<Value>(text) {
        match body.get("message") {
            Some(Value::String(message)) if !message.trim().is_empty() => {
                return message.trim().to_string()
            }
            Some(Value::String(_)) | Some(Value::Null) | None => {}
            Some(other) => return other.to_string(),
        }
        if let Some(error) = body.get("error").and_then(Value::as_str) {
            return match body.get("error_description").and_then(Value::as_str) {
                Some(description) => format!("{}: {}", error, description),
                None => error.to_string(),
            };
        }
    }
    let trimmed = text.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('<') {
        return truncate_utf8_prefix(trimmed, MAX_ERROR_TEXT_BYTES);
    }
    format!(
        "HTTP {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    )
    .trim_end()
    .to_string()
}
