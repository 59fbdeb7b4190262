//! Projections of list payloads onto the fields the tools document.
//!
//! Only list endpoints are shaped. Single-resource fetches (an issue, a wiki
//! page) and the to-do, search and wiki listings are returned as received.

use serde_json::{Map, Value};

const PROJECT_FIELDS: &[&str] = &["id", "name", "web_url", "path_with_namespace"];

const ISSUE_FIELDS: &[&str] = &[
    "id",
    "iid",
    "project_id",
    "title",
    "state",
    "web_url",
    "created_at",
    "updated_at",
    "labels",
];

const NOTE_FIELDS: &[&str] = &[
    "id",
    "body",
    "created_at",
    "updated_at",
    "system",
    "resolvable",
    "confidential",
];

fn pick(source: &Map<String, Value>, fields: &[&str]) -> Map<String, Value> {
    let mut out = Map::new();
    for field in fields {
        if let Some(value) = source.get(*field) {
            out.insert((*field).to_string(), value.clone());
        }
    }
    out
}

fn username(user: Option<&Value>) -> Value {
    user.and_then(|u| u.get("username"))
        .cloned()
        .unwrap_or(Value::Null)
}

fn usernames(users: Option<&Value>) -> Value {
    let names = users
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|u| u.get("username").cloned())
                .collect()
        })
        .unwrap_or_default();
    Value::Array(names)
}

fn shape_list(payload: &Value, shape: fn(&Value) -> Option<Value>) -> Value {
    match payload.as_array() {
        Some(items) => Value::Array(items.iter().filter_map(shape).collect()),
        None => payload.clone(),
    }
}

pub fn shape_project(project: &Value) -> Option<Value> {
    let obj = project.as_object()?;
    Some(Value::Object(pick(obj, PROJECT_FIELDS)))
}

pub fn shape_issue(issue: &Value) -> Option<Value> {
    let obj = issue.as_object()?;
    let mut out = pick(obj, ISSUE_FIELDS);
    out.insert("author".to_string(), username(obj.get("author")));
    out.insert("assignees".to_string(), usernames(obj.get("assignees")));
    Some(Value::Object(out))
}

pub fn shape_note(note: &Value) -> Option<Value> {
    let obj = note.as_object()?;
    let mut out = pick(obj, NOTE_FIELDS);
    out.insert("author".to_string(), username(obj.get("author")));
    Some(Value::Object(out))
}

pub fn shape_projects(payload: &Value) -> Value {
    shape_list(payload, shape_project)
}

pub fn shape_issues(payload: &Value) -> Value {
    shape_list(payload, shape_issue)
}

pub fn shape_notes(payload: &Value) -> Value {
    shape_list(payload, shape_note)
}
