use crate::constants::pagination::{FIRST_PAGE, PAGE_SIZE};
use crate::errors::ToolError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left untouched inside a path segment. Everything else,
/// including `/`, is escaped so namespaced paths stay a single segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_path_segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

/// A single GET against the REST API, relative to `{host}/api/v4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub paginated: bool,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            paginated: false,
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn param_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Appends `page` (defaulting to the first page) and pins `per_page` to
    /// the largest size the API accepts.
    pub fn paginate(mut self, page: Option<u32>) -> Self {
        self = self
            .param("page", page.unwrap_or(FIRST_PAGE))
            .param("per_page", PAGE_SIZE);
        self.paginated = true;
        self
    }

    pub fn query_string(&self) -> Result<String, ToolError> {
        serde_urlencoded::to_string(&self.query)
            .map_err(|err| ToolError::unexpected(format!("Failed to encode query: {}", err)))
    }

    /// Path plus query, as it goes on the wire after the API base.
    pub fn target(&self) -> Result<String, ToolError> {
        let query = self.query_string()?;
        if query.is_empty() {
            Ok(self.path.clone())
        } else {
            Ok(format!("{}?{}", self.path, query))
        }
    }
}
