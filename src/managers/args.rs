//! Typed argument records, one per tool, and the request each one maps to.
//!
//! Records are produced once at the tool boundary. Anything that does not fit
//! the record is an invalid-params failure; nothing is coerced silently.

use crate::errors::ToolError;
use crate::gitlab::{encode_path_segment, ApiRequest};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::num::NonZeroU32;

/// A project, group or user reference. GitLab accepts either the numeric id
/// or a full path, so both JSON strings and integers are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn encoded(&self) -> String {
        encode_path_segment(&self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }
        match Raw::deserialize(deserializer)
            .map_err(|_| D::Error::custom("expected a non-empty string or a positive integer"))?
        {
            Raw::Number(n) => Ok(Self(n.to_string())),
            Raw::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(D::Error::custom("must be a non-empty string"));
                }
                if is_dot_segment(trimmed) {
                    return Err(D::Error::custom(DOT_SEGMENT_MESSAGE));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    }
}

const DOT_SEGMENT_MESSAGE: &str = "must not be '.' or '..'";

/// URL parsing collapses `.` and `..` path segments (escaped or not), which
/// would silently retarget the request.
fn is_dot_segment(text: &str) -> bool {
    matches!(text, "." | "..")
}

fn slug<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let text = non_blank(deserializer)?;
    if is_dot_segment(text.trim()) {
        return Err(D::Error::custom(DOT_SEGMENT_MESSAGE));
    }
    Ok(text)
}

fn non_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let text = String::deserialize(deserializer)?;
    if text.trim().is_empty() {
        return Err(D::Error::custom("must be a non-empty string"));
    }
    Ok(text)
}

fn non_blank_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if text.trim().is_empty() => Err(D::Error::custom("must be a non-empty string")),
        other => Ok(other),
    }
}

pub fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|err| ToolError::invalid_params(format!("Invalid arguments for {}: {}", tool, err)))
}

fn page_number(page: Option<NonZeroU32>) -> Option<u32> {
    page.map(NonZeroU32::get)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListProjectsArgs {
    pub page: Option<NonZeroU32>,
}

impl ListProjectsArgs {
    pub fn to_request(&self) -> ApiRequest {
        ApiRequest::new("/projects").paginate(page_number(self.page))
    }
}

/// Filters shared by `get_issues` and `get_todos`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemFilterArgs {
    pub action: Option<String>,
    pub author_id: Option<ResourceId>,
    pub project_id: Option<ResourceId>,
    pub group_id: Option<ResourceId>,
    pub state: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub page: Option<NonZeroU32>,
}

impl ItemFilterArgs {
    fn with_filters(&self, request: ApiRequest, include_project: bool) -> ApiRequest {
        let project = if include_project {
            self.project_id.as_ref()
        } else {
            None
        };
        request
            .param_opt("action", self.action.as_deref())
            .param_opt("author_id", self.author_id.as_ref())
            .param_opt("project_id", project)
            .param_opt("group_id", self.group_id.as_ref())
            .param_opt("state", self.state.as_deref())
            .param_opt("type", self.item_type.as_deref())
            .paginate(page_number(self.page))
    }

    /// Project-scoped when `project_id` is given; the id then lives in the
    /// path and is not repeated in the query.
    pub fn to_issues_request(&self) -> ApiRequest {
        match &self.project_id {
            Some(project) => self.with_filters(
                ApiRequest::new(format!("/projects/{}/issues", project.encoded())),
                false,
            ),
            None => self.with_filters(ApiRequest::new("/issues"), false),
        }
    }

    pub fn to_todos_request(&self) -> ApiRequest {
        self.with_filters(ApiRequest::new("/todos"), true)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueNotesArgs {
    #[serde(rename = "projectId")]
    pub project_id: ResourceId,
    #[serde(rename = "issueIid")]
    pub issue_iid: u64,
    pub page: Option<NonZeroU32>,
}

impl IssueNotesArgs {
    pub fn to_request(&self) -> ApiRequest {
        ApiRequest::new(format!(
            "/projects/{}/issues/{}/notes",
            self.project_id.encoded(),
            self.issue_iid
        ))
        .paginate(page_number(self.page))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueArgs {
    #[serde(rename = "projectId")]
    pub project_id: ResourceId,
    #[serde(rename = "issueIid")]
    pub issue_iid: u64,
}

impl IssueArgs {
    pub fn to_request(&self) -> ApiRequest {
        ApiRequest::new(format!(
            "/projects/{}/issues/{}",
            self.project_id.encoded(),
            self.issue_iid
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchArgs {
    #[serde(deserialize_with = "non_blank")]
    pub scope: String,
    #[serde(deserialize_with = "non_blank")]
    pub search: String,
    #[serde(rename = "projectId", default)]
    pub project_id: Option<ResourceId>,
    pub page: Option<NonZeroU32>,
}

impl SearchArgs {
    pub fn to_request(&self) -> ApiRequest {
        let path = match &self.project_id {
            Some(project) => format!("/projects/{}/search", project.encoded()),
            None => "/search".to_string(),
        };
        ApiRequest::new(path)
            .param("scope", &self.scope)
            .param("search", &self.search)
            .paginate(page_number(self.page))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WikiPageArgs {
    #[serde(rename = "projectId")]
    pub project_id: ResourceId,
    #[serde(deserialize_with = "slug")]
    pub slug: String,
    pub render_html: Option<bool>,
    #[serde(default, deserialize_with = "non_blank_opt")]
    pub version: Option<String>,
}

impl WikiPageArgs {
    pub fn to_request(&self) -> ApiRequest {
        ApiRequest::new(format!(
            "/projects/{}/wikis/{}",
            self.project_id.encoded(),
            encode_path_segment(&self.slug)
        ))
        .param_opt("render_html", self.render_html)
        .param_opt("version", self.version.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WikiPagesArgs {
    #[serde(rename = "projectId")]
    pub project_id: ResourceId,
    pub with_content: Option<bool>,
    pub page: Option<NonZeroU32>,
}

impl WikiPagesArgs {
    pub fn to_request(&self) -> ApiRequest {
        ApiRequest::new(format!("/projects/{}/wikis", self.project_id.encoded()))
            .param_opt("with_content", self.with_content)
            .paginate(page_number(self.page))
    }
}
